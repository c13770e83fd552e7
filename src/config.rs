use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::assistant::DEFAULT_EXCERPT_LIMIT;

/// Runtime configuration for docsense
///
/// Holds display-level knobs only; the alias and keyword tables that drive
/// detection are compiled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Longest full-text excerpt a reply may carry, in graphemes
    pub excerpt_limit: usize,
    /// Directory the `ask` command loads when no --library is given
    pub library_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
            library_dir: None,
        }
    }
}

impl Config {
    /// Load config from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                let content = fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&content)?;
                return Ok(config);
            }
        }

        // Return defaults if no config file found
        Ok(Config::default())
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::get_config_path() {
            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let content = toml::to_string_pretty(self)?;
            fs::write(&config_path, content)?;
        }

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docsense").join("config.toml"))
    }
}
