//! Palette configuration.
//!
//! Stored as TOML at `~/.config/taskdeck/palette.toml` (or the XDG
//! equivalent). A missing file means defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! visible_rows = 12
//! show_detail = true
//! placeholder = "Jump to…"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or saving palette configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Height of the result list, in rows.
    pub visible_rows: usize,
    /// Show the secondary line (path, parent + status) next to labels.
    pub show_detail: bool,
    /// Text shown in the empty search input.
    pub placeholder: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            visible_rows: 8,
            show_detail: true,
            placeholder: "Search projects, tasks, sessions…".to_string(),
        }
    }
}

impl PaletteConfig {
    /// Load configuration from the default location.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// - Primary: `$XDG_CONFIG_HOME/taskdeck/palette.toml`
    /// - Fallback: platform config dir (e.g. `~/.config/taskdeck/palette.toml`)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Ok(PathBuf::from(xdg_config)
                .join("taskdeck")
                .join("palette.toml"));
        }

        dirs::config_dir()
            .map(|p| p.join("taskdeck").join("palette.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.visible_rows == 0 {
            return Err(ConfigError::Validation(
                "visible_rows must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
