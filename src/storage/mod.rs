use leptos::logging;
use thiserror::Error;

use crate::config::{AppConfig, BackendKind};
use crate::entry::Entry;

pub mod local;
#[cfg(feature = "supabase")]
pub mod remote;

pub use local::LocalStore;
#[cfg(feature = "supabase")]
pub use remote::RemoteStore;

/// Failures inside a persistence adapter. These never cross the adapter
/// boundary; the trait methods catch them, log, and degrade to empty/no-op
/// results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("browser storage is unavailable")]
    StorageUnavailable,
    #[error("stored data is malformed: {0}")]
    Serde(#[from] serde_json::Error),
    #[cfg(feature = "supabase")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "supabase")]
    #[error("backend returned status {0}")]
    Status(u16),
}

/// Capability interface over entry persistence.
///
/// `load` returns the history newest-first, at most
/// [`crate::entry::MAX_ENTRIES`] items. `save` derives the title itself and
/// returns the stored entry, or `None` when the write was skipped or failed.
#[allow(async_fn_in_trait)]
pub trait EntryStore {
    async fn load(&self) -> Vec<Entry>;
    async fn save(&self, content: &str) -> Option<Entry>;
    async fn delete(&self, id: &str) -> bool;
    async fn clear_all(&self) -> bool;
}

/// The adapter selected at startup from [`AppConfig`].
#[derive(Clone)]
pub enum Store {
    Local(LocalStore),
    #[cfg(feature = "supabase")]
    Supabase(RemoteStore),
}

impl Store {
    pub fn from_config(config: &AppConfig) -> Store {
        #[cfg(feature = "supabase")]
        if config.has_remote_credentials() {
            return Store::Supabase(RemoteStore::new(
                &config.supabase_url,
                &config.supabase_anon_key,
            ));
        }
        if config.backend == BackendKind::Supabase {
            logging::warn!(
                "supabase backend requested but not usable; falling back to local storage"
            );
        }
        Store::Local(LocalStore::new())
    }

    /// Whether mutations must be followed by an explicit reload. The remote
    /// adapter refreshes through the realtime push instead.
    pub fn needs_manual_reload(&self) -> bool {
        matches!(self, Store::Local(_))
    }
}

impl EntryStore for Store {
    async fn load(&self) -> Vec<Entry> {
        match self {
            Store::Local(store) => store.load().await,
            #[cfg(feature = "supabase")]
            Store::Supabase(store) => store.load().await,
        }
    }

    async fn save(&self, content: &str) -> Option<Entry> {
        match self {
            Store::Local(store) => store.save(content).await,
            #[cfg(feature = "supabase")]
            Store::Supabase(store) => store.save(content).await,
        }
    }

    async fn delete(&self, id: &str) -> bool {
        match self {
            Store::Local(store) => store.delete(id).await,
            #[cfg(feature = "supabase")]
            Store::Supabase(store) => store.delete(id).await,
        }
    }

    async fn clear_all(&self) -> bool {
        match self {
            Store::Local(store) => store.clear_all().await,
            #[cfg(feature = "supabase")]
            Store::Supabase(store) => store.clear_all().await,
        }
    }
}
