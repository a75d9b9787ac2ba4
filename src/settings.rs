//! Player settings and preferences
//!
//! Persisted separately from the scoreboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Player settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Saved username (display form, as the player typed it)
    pub username: Option<String>,
    /// Gameplay tuning overrides
    pub tuning: Tuning,
}

impl Settings {
    /// Parse settings from JSON, logging and falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.normalized(),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {e}");
                Self::default()
            }
        }
    }

    /// Trim the username (dropping blanks) and sanitize tuning
    pub fn normalized(mut self) -> Self {
        self.username = self
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        self.tuning = self.tuning.sanitized();
        self
    }

    /// Set the username, returning whether it changed
    pub fn set_username(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.username.as_deref() == Some(name) {
            return false;
        }
        self.username = Some(name.to_string());
        true
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "tri_dodge_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(storage) = Self::storage()
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            log::info!("Loaded settings from LocalStorage");
            return Self::from_json(&json);
        }

        log::info!("No stored settings, using defaults");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) => {
                log::warn!("Could not read settings {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
