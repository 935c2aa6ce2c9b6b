//! User settings with defaults merged under persisted overrides

use std::fs;
use std::path::{Path, PathBuf};

use rentdesk_common::{RentalError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::error;

use crate::fs::write_atomic;

/// Flat settings record; unset keys resolve to [`Settings::default`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub notify_lease_expiry: bool,
    pub notify_lease_days: u32,
    pub currency_symbol: String,
    pub accent_color: String,
    pub theme: String,
    pub graph_color: String,
    pub animations_enabled: bool,
    pub custom_fields: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notify_lease_expiry: true,
            notify_lease_days: 30,
            currency_symbol: "₪".to_string(),
            accent_color: "#0d6efd".to_string(),
            theme: "system".to_string(),
            graph_color: "#22c55e".to_string(),
            animations_enabled: true,
            custom_fields: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// JSON file holding [`Settings`]
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(&self) -> Settings {
        if !self.path.is_file() {
            return Settings::default();
        }

        match fs::read_to_string(&self.path)
            .map_err(RentalError::from)
            .and_then(|content| {
                serde_json::from_str::<Settings>(&content)
                    .map_err(|e| RentalError::InvalidFormat(e.to_string()))
            }) {
            Ok(settings) => settings,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Could not load settings");
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_vec_pretty(settings)
            .map_err(|e| RentalError::IoError(format!("failed to serialize settings: {}", e)))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}
