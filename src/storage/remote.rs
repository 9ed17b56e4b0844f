use leptos::logging;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::json;

use super::{EntryStore, StoreError};
use crate::entry::{derive_title, Entry, MAX_ENTRIES};

const TABLE: &str = "clipboard_entries";

/// `id=neq.<sentinel>` matches every real row; PostgREST refuses an
/// unfiltered DELETE.
const CLEAR_ALL_SENTINEL: &str = "00000000-0000-0000-0000-000000000000";

/// Persistence adapter over a Supabase project's PostgREST endpoint. Ids,
/// timestamps and the row cap are the backend's concern; the client only
/// bounds its reads with `limit`.
#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn try_load(&self) -> Result<Vec<Entry>, StoreError> {
        let url = format!(
            "{}?select=*&order=created_at.desc&limit={MAX_ENTRIES}",
            self.table_url()
        );
        let response = self.request(Method::GET, &url).send().await?;
        Ok(ok_or_status(response)?.json().await?)
    }

    async fn try_save(&self, content: &str) -> Result<Option<Entry>, StoreError> {
        let body = json!([{
            "content": content,
            "title": derive_title(content),
            "user_id": null,
        }]);
        let response = self
            .request(Method::POST, &self.table_url())
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let rows: Vec<Entry> = ok_or_status(response)?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn try_delete(&self, id: &str) -> Result<bool, StoreError> {
        let url = format!("{}?id=eq.{id}", self.table_url());
        let response = self
            .request(Method::DELETE, &url)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        // With return=representation the deleted rows come back; an empty
        // array means the id matched nothing.
        let rows: Vec<Entry> = ok_or_status(response)?.json().await?;
        Ok(!rows.is_empty())
    }

    async fn try_clear_all(&self) -> Result<(), StoreError> {
        let url = format!("{}?id=neq.{CLEAR_ALL_SENTINEL}", self.table_url());
        let response = self.request(Method::DELETE, &url).send().await?;
        ok_or_status(response)?;
        Ok(())
    }
}

fn ok_or_status(response: Response) -> Result<Response, StoreError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(StoreError::Status(response.status().as_u16()))
    }
}

impl EntryStore for RemoteStore {
    async fn load(&self) -> Vec<Entry> {
        match self.try_load().await {
            Ok(entries) => entries,
            Err(err) => {
                logging::error!("failed to load history from backend: {err}");
                Vec::new()
            }
        }
    }

    async fn save(&self, content: &str) -> Option<Entry> {
        match self.try_save(content).await {
            Ok(saved) => saved,
            Err(err) => {
                logging::error!("failed to save entry: {err}");
                None
            }
        }
    }

    async fn delete(&self, id: &str) -> bool {
        match self.try_delete(id).await {
            Ok(removed) => removed,
            Err(err) => {
                logging::error!("failed to delete entry {id}: {err}");
                false
            }
        }
    }

    async fn clear_all(&self) -> bool {
        match self.try_clear_all().await {
            Ok(()) => true,
            Err(err) => {
                logging::error!("failed to clear history: {err}");
                false
            }
        }
    }
}
