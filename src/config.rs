use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 500;
pub const MAX_SPLASH_DELAY_MS: u64 = 5_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_splash_delay_ms")]
    pub splash_delay_ms: u64,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sightright")
}

fn default_batch_size() -> usize {
    30
}
fn default_splash_delay_ms() -> u64 {
    70
}
fn default_database_path() -> String {
    data_dir().join("SightRight.db").to_string_lossy().to_string()
}
fn default_theme() -> String {
    "classic".to_string()
}
fn default_log_dir() -> String {
    data_dir().join("logs").to_string_lossy().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            splash_delay_ms: default_splash_delay_ms(),
            database_path: default_database_path(),
            theme: default_theme(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sightright")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn splash_delay(&self) -> Duration {
        Duration::from_millis(self.splash_delay_ms)
    }

    /// Clamp values a hand-edited file or a flag may have pushed out of range.
    pub fn validate(&mut self) {
        self.batch_size = self.batch_size.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE);
        self.splash_delay_ms = self.splash_delay_ms.min(MAX_SPLASH_DELAY_MS);
        if self.database_path.trim().is_empty() {
            self.database_path = default_database_path();
        }
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.batch_size, 30);
        assert_eq!(config.splash_delay_ms, 70);
        assert_eq!(config.theme, "classic");
        assert!(config.database_path.ends_with("SightRight.db"));
        assert!(config.log_dir.contains("logs"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
batch_size = 12
theme = "dusk"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.batch_size, 12);
        assert_eq!(config.theme, "dusk");
        assert_eq!(config.splash_delay_ms, 70);
        assert_eq!(config.splash_delay(), Duration::from_millis(70));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.batch_size, deserialized.batch_size);
        assert_eq!(config.splash_delay_ms, deserialized.splash_delay_ms);
        assert_eq!(config.database_path, deserialized.database_path);
        assert_eq!(config.log_dir, deserialized.log_dir);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.batch_size = 0;
        config.splash_delay_ms = 60_000;
        config.theme = "  ".to_string();
        config.database_path = String::new();
        config.validate();
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.splash_delay_ms, 5_000);
        assert_eq!(config.theme, "classic");
        assert_eq!(config.database_path, default_database_path());

        config.batch_size = 10_000;
        config.validate();
        assert_eq!(config.batch_size, 500);
    }
}
