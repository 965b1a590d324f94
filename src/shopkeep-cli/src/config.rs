//! Configuration management for shopkeep CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = "vendor-tables";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub catalog_dir: Option<PathBuf>,
    pub spells_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("shopkeep");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Equipment pack: explicit argument, then configured default
    pub fn resolve_catalog(&self, arg: Option<PathBuf>) -> Result<PathBuf> {
        arg.or_else(|| self.catalog_dir.clone()).context(
            "No equipment pack given. Pass --catalog or run: shopkeep configure --catalog <DIR>",
        )
    }

    /// Spell pack: explicit argument, then configured default
    pub fn resolve_spells(&self, arg: Option<PathBuf>) -> Result<PathBuf> {
        arg.or_else(|| self.spells_dir.clone()).context(
            "No spell pack given. Pass --spells or run: shopkeep configure --spells <DIR>",
        )
    }

    /// Output directory: explicit argument, then configured default, then `vendor-tables`
    pub fn resolve_output(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}
