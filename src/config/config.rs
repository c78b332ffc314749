//! Orquestrador configuration management
//! Handles loading and saving the config file

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::store::{HistoryMode, LatencyProfile, StoreOptions, ValidationMode};

pub const CONFIG_ENV: &str = "ORQUESTRADOR_CONFIG";

/// Orquestrador configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Database path
    #[serde(default = "default_db_path")]
    pub database_path: String,

    /// Store behavior
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_db_path() -> String {
    "~/.orquestrador/orquestrador.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            store: StoreConfig::default(),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Delay operations as if a remote backend answered them
    #[serde(default = "default_simulate_latency")]
    pub simulate_latency: bool,

    #[serde(default)]
    pub validation: ValidationMode,

    #[serde(default)]
    pub history: HistoryMode,
}

fn default_simulate_latency() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            simulate_latency: default_simulate_latency(),
            validation: ValidationMode::default(),
            history: HistoryMode::default(),
        }
    }
}

impl StoreConfig {
    pub fn options(&self) -> StoreOptions {
        StoreOptions::default()
            .with_latency(LatencyProfile::from_flag(self.simulate_latency))
            .with_validation(self.validation)
            .with_history(self.history)
    }
}

impl Config {
    /// Load config from the default location or specified path
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = Self::config_path(path)?;

        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config = Self::parse(&raw)?;

        debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("Failed to parse config file")
    }

    /// Save config to the default location
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = Self::config_path(path)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the config file path
    fn config_path(path: Option<&str>) -> Result<PathBuf> {
        // Check env override first
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(env_path));
        }

        if let Some(p) = path {
            return Ok(PathBuf::from(p));
        }

        let home = dirs::home_dir().context("Cannot find home directory")?;
        Ok(home.join(".orquestrador").join("config.yml"))
    }

    /// Resolve database path (expand a leading ~)
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        match self.database_path.strip_prefix('~') {
            Some(rest) => {
                let home = dirs::home_dir().context("Cannot find home directory")?;
                Ok(home.join(rest.trim_start_matches('/')))
            }
            None => Ok(PathBuf::from(&self.database_path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.store.simulate_latency);
        assert_eq!(config.store.validation, ValidationMode::Passthrough);
        assert_eq!(config.store.history, HistoryMode::Stored);
    }

    #[test]
    fn parses_store_section() {
        let raw = r#"
database_path: /tmp/orq.db
store:
  simulate_latency: false
  validation: strict
  history: caller_supplied
"#;
        let config = Config::parse(raw).unwrap();
        assert_eq!(config.database_path, "/tmp/orq.db");
        assert_eq!(config.store.validation, ValidationMode::Strict);
        assert_eq!(config.store.history, HistoryMode::CallerSupplied);

        let options = config.store.options();
        assert_eq!(options.latency, LatencyProfile::none());
        assert!(options.validation.is_strict());
    }

    #[test]
    fn absolute_db_path_is_kept() {
        let config = Config {
            database_path: "/var/lib/orq.db".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_db_path().unwrap(),
            PathBuf::from("/var/lib/orq.db")
        );
    }

    #[test]
    fn rejects_unknown_validation_mode() {
        assert!(Config::parse("store:\n  validation: lenient\n").is_err());
    }
}
