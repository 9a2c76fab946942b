//! Client configuration. One instance per editing-session lifetime; there
//! are no module-level globals.

pub const API_BASE_DEFAULT: &str = "/api";

/// What to do with the optimistic local value when a persist fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncFailurePolicy {
    /// Keep the local edit; the store stays dirty until a later persist
    /// confirms.
    #[default]
    KeepLocal,
    /// Revert to the pre-edit snapshot.
    Rollback,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub sync_failure: SyncFailurePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE_DEFAULT.to_string(),
            sync_failure: SyncFailurePolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::from_browser;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::ClientConfig;

    const API_BASE_KEY: &str = "todana.debug.api_base";

    fn read_storage_string(key: &str) -> Option<String> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;
        let raw = storage.get_item(key).ok()??;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Default configuration with localStorage debug overrides applied.
    pub fn from_browser() -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(api_base) = read_storage_string(API_BASE_KEY) {
            config.api_base = api_base;
        }
        config
    }
}
