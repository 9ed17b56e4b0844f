use chrono::{DateTime, TimeZone, Utc};
use leptos::logging;
use serde::{Deserialize, Serialize};

use super::{EntryStore, StoreError};
use crate::entry::{self, derive_title, to_base36, Entry};

const STORAGE_KEY: &str = "clipboard-sync-data";

/// Wire format of one record in the localStorage array. `timestamp` is epoch
/// milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredEntry {
    id: String,
    content: String,
    timestamp: f64,
    title: String,
}

impl StoredEntry {
    fn from_entry(entry: &Entry) -> StoredEntry {
        StoredEntry {
            id: entry.id.clone(),
            content: entry.content.clone(),
            timestamp: entry.created_at.timestamp_millis() as f64,
            title: entry.title.clone(),
        }
    }

    fn into_entry(self) -> Entry {
        let ts = Utc
            .timestamp_millis_opt(self.timestamp as i64)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH);
        Entry {
            id: self.id,
            content: self.content,
            title: self.title,
            created_at: ts,
            updated_at: ts,
            user_id: None,
        }
    }
}

/// Persistence adapter over one `localStorage` key holding the whole history
/// as a JSON array, newest first. Id and timestamp generation, the duplicate
/// check and the size cap all happen client-side; every mutation rewrites
/// the list in one `setItem`.
#[derive(Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn backing() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StoreError::StorageUnavailable)
    }

    fn read_all() -> Result<Vec<Entry>, StoreError> {
        let storage = Self::backing()?;
        let Some(raw) = storage
            .get_item(STORAGE_KEY)
            .map_err(|_| StoreError::StorageUnavailable)?
        else {
            return Ok(Vec::new());
        };
        let records: Vec<StoredEntry> = serde_json::from_str(&raw)?;
        Ok(records.into_iter().map(StoredEntry::into_entry).collect())
    }

    fn write_all(entries: &[Entry]) -> Result<(), StoreError> {
        let records: Vec<StoredEntry> = entries.iter().map(StoredEntry::from_entry).collect();
        let raw = serde_json::to_string(&records)?;
        Self::backing()?
            .set_item(STORAGE_KEY, &raw)
            .map_err(|_| StoreError::StorageUnavailable)
    }

    fn try_save(content: &str) -> Result<Option<Entry>, StoreError> {
        let mut entries = Self::read_all()?;
        let now = Utc::now();
        let candidate = Entry {
            id: generate_id(),
            content: content.to_string(),
            title: derive_title(content),
            created_at: now,
            updated_at: now,
            user_id: None,
        };
        if !entry::push_latest(&mut entries, candidate.clone()) {
            return Ok(None);
        }
        Self::write_all(&entries)?;
        Ok(Some(candidate))
    }

    fn try_delete(id: &str) -> Result<bool, StoreError> {
        let mut entries = Self::read_all()?;
        if !entry::remove_by_id(&mut entries, id) {
            return Ok(false);
        }
        Self::write_all(&entries)?;
        Ok(true)
    }
}

impl EntryStore for LocalStore {
    async fn load(&self) -> Vec<Entry> {
        match Self::read_all() {
            Ok(entries) => entries,
            Err(err) => {
                logging::error!("failed to load history from localStorage: {err}");
                Vec::new()
            }
        }
    }

    async fn save(&self, content: &str) -> Option<Entry> {
        match Self::try_save(content) {
            Ok(saved) => saved,
            Err(err) => {
                logging::error!("failed to save entry: {err}");
                None
            }
        }
    }

    async fn delete(&self, id: &str) -> bool {
        match Self::try_delete(id) {
            Ok(removed) => removed,
            Err(err) => {
                logging::error!("failed to delete entry {id}: {err}");
                false
            }
        }
    }

    async fn clear_all(&self) -> bool {
        match Self::write_all(&[]) {
            Ok(()) => true,
            Err(err) => {
                logging::error!("failed to clear history: {err}");
                false
            }
        }
    }
}

/// Opaque unique id: millisecond epoch plus a random suffix, both base36.
fn generate_id() -> String {
    let millis = js_sys::Date::now() as u64;
    let suffix = (js_sys::Math::random() * 2_176_782_336.0) as u64;
    format!("{}{}", to_base36(millis), to_base36(suffix))
}
