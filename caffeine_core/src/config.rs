//! Configuration file support for Zarurat.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/zarurat/config.toml`.

use crate::series::MAX_WINDOW_HOURS;
use crate::{AnalyticsConfig, ChartWindow, DecayModel, Error, Result, StatusBands};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub user: UserConfig,

    #[serde(default)]
    pub decay: DecayModel,

    #[serde(default)]
    pub chart: ChartWindow,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub status: StatusBands,
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

/// Owner recorded on every logged drink
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
        }
    }
}

/// Watch mode refresh configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_seconds")]
    pub interval_seconds: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_refresh_seconds(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("zarurat")
}

fn default_user_id() -> String {
    "local".into()
}

fn default_refresh_seconds() -> u64 {
    crate::refresh::DEFAULT_REFRESH_INTERVAL.as_secs()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
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
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("zarurat").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
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

    /// Reject values the analytics can't work with
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !(self.decay.half_life_hours > 0.0) {
            errors.push(format!(
                "decay.half_life_hours must be positive, got {}",
                self.decay.half_life_hours
            ));
        }
        if !(self.decay.lookback_hours >= 0.0) {
            errors.push(format!(
                "decay.lookback_hours must not be negative, got {}",
                self.decay.lookback_hours
            ));
        }
        for (key, value) in [
            ("chart.past_hours", self.chart.past_hours),
            ("chart.future_hours", self.chart.future_hours),
            ("chart.prefilter_hours", self.chart.prefilter_hours),
        ] {
            if !(value >= 0.0) {
                errors.push(format!("{} must not be negative, got {}", key, value));
            } else if value > MAX_WINDOW_HOURS {
                errors.push(format!(
                    "{} must be at most {} hours, got {}",
                    key, MAX_WINDOW_HOURS, value
                ));
            }
        }
        if self.chart.interval_minutes == 0 {
            errors.push("chart.interval_minutes must be at least 1".to_string());
        }
        if self.refresh.interval_seconds == 0 {
            errors.push("refresh.interval_seconds must be at least 1".to_string());
        }
        if self.user.id.trim().is_empty() {
            errors.push("user.id must not be empty".to_string());
        }
        errors.extend(self.status.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(errors.join("; ")))
        }
    }

    /// The analytics parameters carried by this config
    pub fn analytics(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            decay: self.decay,
            chart: self.chart.clone(),
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.decay.half_life_hours, 5.0);
        assert_eq!(config.decay.lookback_hours, 48.0);
        assert_eq!(config.chart.interval_minutes, 5);
        assert_eq!(config.refresh.interval_seconds, 120);
        assert_eq!(config.user.id, "local");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.decay, parsed.decay);
        assert_eq!(config.chart, parsed.chart);
        assert_eq!(config.status, parsed.status);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[chart]
future_hours = 6.0

[user]
id = "ayesha"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chart.future_hours, 6.0);
        assert_eq!(config.chart.past_hours, 24.0); // default
        assert_eq!(config.user.id, "ayesha");
        assert_eq!(config.status.bands.len(), 4);
    }

    #[test]
    fn test_chart_window_capped() {
        let toml_str = r#"
[chart]
past_hours = 1e15
prefilter_hours = 169.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        match config.validate() {
            Err(Error::Config(msg)) => {
                assert!(msg.contains("chart.past_hours must be at most 168"));
                assert!(msg.contains("chart.prefilter_hours"));
                assert!(!msg.contains("chart.future_hours"));
            }
            other => panic!("expected config error, got {:?}", other),
        }

        let mut config = Config::default();
        config.chart.past_hours = MAX_WINDOW_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let toml_str = r#"
[decay]
half_life_hours = 0.0

[chart]
interval_minutes = 0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        match config.validate() {
            Err(Error::Config(msg)) => {
                assert!(msg.contains("half_life_hours"));
                assert!(msg.contains("interval_minutes"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.decay.half_life_hours = 6.0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.decay.half_life_hours, 6.0);
    }
}
