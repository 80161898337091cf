//! Configuration management for flightinfo.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::display::DEFAULT_TIME_FORMAT;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightinfo";

/// Default flights document name.
const FLIGHTS_FILE_NAME: &str = "flights.json";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "FLIGHTINFO_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTINFO_`, sections split by `__`)
/// 2. TOML config file at `~/.config/flightinfo/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Flights document locations.
    pub data: DataConfig,
    /// Table output settings.
    pub display: DisplayConfig,
}

/// Where flights are read from and written to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Document loaded at startup.
    /// Defaults to `~/.local/share/flightinfo/flights.json`
    pub source_path: Option<PathBuf>,
    /// Document written by `sync`.
    /// Defaults to the source path.
    pub save_path: Option<PathBuf>,
}

/// Table output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// strftime format for departure and arrival columns.
    pub time_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("source_path", &self.data.source_path),
            ("save_path", &self.data.save_path),
        ] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must not be empty"),
                });
            }
        }

        if self.display.time_format.is_empty() {
            return Err(Error::ConfigValidation {
                message: "time_format must not be empty".to_string(),
            });
        }
        if StrftimeItems::new(&self.display.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::ConfigValidation {
                message: format!("invalid time_format: {}", self.display.time_format),
            });
        }

        Ok(())
    }

    /// Get the source document path, resolving defaults if not set.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.data
            .source_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(FLIGHTS_FILE_NAME))
    }

    /// Get the save document path, falling back to the source path.
    #[must_use]
    pub fn save_path(&self) -> PathBuf {
        self.data
            .save_path
            .clone()
            .unwrap_or_else(|| self.source_path())
    }

    /// Get the timestamp format used by tables.
    #[must_use]
    pub fn time_format(&self) -> &str {
        &self.display.time_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.data.source_path.is_none());
        assert!(config.data.save_path.is_none());
        assert_eq!(config.display.time_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_source_path() {
        let mut config = Config::default();
        config.data.source_path = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("source_path"));
    }

    #[test]
    fn test_validate_empty_save_path() {
        let mut config = Config::default();
        config.data.save_path = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("save_path"));
    }

    #[test]
    fn test_validate_invalid_time_format() {
        let mut config = Config::default();
        config.display.time_format = "%Y-%Q".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid time_format"));
    }

    #[test]
    fn test_validate_empty_time_format() {
        let mut config = Config::default();
        config.display.time_format = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_path_default() {
        let config = Config::default();
        let path = config.source_path();

        assert!(path.ends_with("flightinfo/flights.json"));
    }

    #[test]
    fn test_save_path_falls_back_to_source() {
        let mut config = Config::default();
        config.data.source_path = Some(PathBuf::from("/srv/flights.json"));

        assert_eq!(config.save_path(), PathBuf::from("/srv/flights.json"));
    }

    #[test]
    fn test_save_path_custom() {
        let mut config = Config::default();
        config.data.save_path = Some(PathBuf::from("/srv/out.json"));

        assert_eq!(config.save_path(), PathBuf::from("/srv/out.json"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.ends_with("flightinfo/config.toml"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "flightinfo_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[data]\nsource_path = \"/srv/in.json\"\nsave_path = \"/srv/out.json\"\n\n[display]\ntime_format = \"%H:%M\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.source_path(), PathBuf::from("/srv/in.json"));
        assert_eq!(config.save_path(), PathBuf::from("/srv/out.json"));
        assert_eq!(config.time_format(), "%H:%M");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("flightinfo_no_such_config.toml");
        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
