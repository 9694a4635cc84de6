//! Configuration file support for smacheck.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/smacheck/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub usage: UsageConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Usage counter configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Session flag that marks the counter as already incremented
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Counter record file name inside the data directory
    #[serde(default = "default_usage_file")]
    pub file_name: String,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_key: default_session_key(),
            file_name: default_usage_file(),
        }
    }
}

/// Output format of the printable report
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Report rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_meter_width")]
    pub meter_width: usize,

    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            meter_width: default_meter_width(),
            format: ReportFormat::default(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("smacheck")
}

fn default_true() -> bool {
    true
}

fn default_session_key() -> String {
    "sma-usage-incremented".into()
}

fn default_usage_file() -> String {
    "usage.json".into()
}

fn default_meter_width() -> usize {
    20
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("smacheck").join("config.toml")
    }

    /// Path of the usage counter record
    pub fn usage_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.usage.file_name)
    }

    /// Reject values the report and usage store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.report.meter_width == 0 || self.report.meter_width > 100 {
            return Err(Error::Config(format!(
                "report.meter_width must be between 1 and 100, got {}",
                self.report.meter_width
            )));
        }
        if self.usage.session_key.trim().is_empty() {
            return Err(Error::Config("usage.session_key must not be empty".into()));
        }
        if self.usage.file_name.trim().is_empty() {
            return Err(Error::Config("usage.file_name must not be empty".into()));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.usage.enabled);
        assert_eq!(config.usage.session_key, "sma-usage-incremented");
        assert_eq!(config.report.meter_width, 20);
        assert_eq!(config.report.format, ReportFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.report.meter_width, parsed.report.meter_width);
        assert_eq!(config.usage.file_name, parsed.usage.file_name);
        assert_eq!(config.data.data_dir, parsed.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[report]
format = "json"

[usage]
enabled = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.report.format, ReportFormat::Json);
        assert_eq!(config.report.meter_width, 20); // default
        assert!(!config.usage.enabled);
        assert_eq!(config.usage.file_name, "usage.json"); // default
    }

    #[test]
    fn test_invalid_meter_width_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[report]\nmeter_width = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.report.meter_width = 40;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.report.meter_width, 40);
    }
}
