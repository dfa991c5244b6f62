//! TOML configuration file
//!
//! ```toml
//! data_file = "/home/me/cards/state.json"
//!
//! [review]
//! new_cards_per_day = 15
//! max_interval = 180
//! default_ease_factor = 2.5
//! learning_steps = [1, 10, 1440]
//! ```
//!
//! Every key is optional. Review values go through the settings validator,
//! so a bad value is clamped instead of rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flashcards::settings::{normalize, RawReviewSettings, ReviewSettings};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the deck state snapshot lives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub review: RawReviewSettings,
}

impl AppConfig {
    /// Default config location (e.g., ~/.config/recall/recall.toml)
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("recall").join("recall.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validated review settings, falling back to the built-in defaults
    pub fn review_settings(&self) -> ReviewSettings {
        normalize(&self.review, &ReviewSettings::default())
    }
}
