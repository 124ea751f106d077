//! Game settings
//!
//! Persisted in LocalStorage in the browser; read from the environment on
//! native. Everything is optional: with no API key the game runs on
//! fallback commentary.

use serde::{Deserialize, Serialize};

use crate::commentary::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::sim::StepMode;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Commentary ===
    /// Gemini API key. `None` selects fallback commentary.
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// Gemini REST endpoint (without the `/models/...` suffix)
    pub endpoint: String,

    // === Simulation ===
    /// Per-tick or time-scaled falling
    pub step_mode: StepMode,
    /// Balance overrides
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            step_mode: StepMode::PerTick,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Environment variables checked for an API key, in order
    pub const API_KEY_VARS: [&'static str; 2] = ["GEMINI_API_KEY", "API_KEY"];
    /// Environment variable overriding the model name
    pub const MODEL_VAR: &'static str = "FRUIT_CATCH_MODEL";

    /// The API key, if one is set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Replace the API key (blank keys count as none)
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Settings with balance values repaired (see [`Tuning::sanitized`])
    pub fn sanitized(mut self) -> Self {
        self.tuning = self.tuning.sanitized();
        self
    }

    /// Build settings from a variable lookup (the process environment on native)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = Self::API_KEY_VARS
            .iter()
            .find_map(|&var| lookup(var).filter(|value| !value.trim().is_empty()));
        let mut settings = Self::default().with_api_key(api_key);
        if let Some(model) = lookup(Self::MODEL_VAR).filter(|m| !m.trim().is_empty()) {
            settings.model = model.trim().to_string();
        }
        settings
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fruit_catch_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.sanitized();
                    }
                    Err(err) => log::warn!("Ignoring malformed settings: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the process environment
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
