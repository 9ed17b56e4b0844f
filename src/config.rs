use leptos::logging;
use serde::Deserialize;
use wasm_bindgen::JsValue;

const CONFIG_GLOBAL: &str = "CLIPSYNC_CONFIG";
const DARK_MODE_KEY: &str = "dark-mode";

/// Runtime configuration, injected by the host page as a
/// `window.CLIPSYNC_CONFIG` object. Absent or malformed config falls back to
/// the local-storage backend.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Supabase,
}

impl AppConfig {
    /// Remote backend requested and credentials present.
    pub fn has_remote_credentials(&self) -> bool {
        self.backend == BackendKind::Supabase
            && !self.supabase_url.trim().is_empty()
            && !self.supabase_anon_key.trim().is_empty()
    }
}

pub fn load_config() -> AppConfig {
    let Some(window) = web_sys::window() else {
        return AppConfig::default();
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .unwrap_or(JsValue::UNDEFINED);
    if value.is_undefined() || value.is_null() {
        return AppConfig::default();
    }
    match serde_wasm_bindgen::from_value(value) {
        Ok(config) => config,
        Err(err) => {
            logging::warn!("ignoring malformed {CONFIG_GLOBAL}: {err:?}");
            AppConfig::default()
        }
    }
}

/// Dark-mode device preference, persisted under its own localStorage key.
pub fn load_dark_mode() -> bool {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(DARK_MODE_KEY).ok().flatten())
        .is_some_and(|value| value == "true")
}

pub fn store_dark_mode(enabled: bool) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(DARK_MODE_KEY, if enabled { "true" } else { "false" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_local() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.backend, BackendKind::Local);
        assert!(!config.has_remote_credentials());
    }

    #[test]
    fn supabase_config_parses() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "backend": "supabase",
                "supabase_url": "https://proj.supabase.co",
                "supabase_anon_key": "anon"
            }"#,
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::Supabase);
        assert!(config.has_remote_credentials());
    }

    #[test]
    fn supabase_without_credentials_is_not_remote() {
        let config: AppConfig =
            serde_json::from_str(r#"{"backend": "supabase"}"#).unwrap();
        assert!(!config.has_remote_credentials());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(serde_json::from_str::<AppConfig>(r#"{"backend": "ftp"}"#).is_err());
    }
}
