//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use demeter_core::{DEFAULT_BACKEND_URL, DEFAULT_HISTORY_CAPACITY, Metric, ThresholdConfig};
use serde::{Deserialize, Serialize};

use crate::cli::ConfigKey;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Seconds between current-reading polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Number of points kept in the trend window
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Status card bands
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Dashboard-specific configuration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Theme preference: "dark" or "light"
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Metric shown first on the trend chart: "temp", "ph", "ec" or "all"
    #[serde(default = "default_metric")]
    pub default_metric: String,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_poll_interval() -> u64 {
    10
}

fn default_timeout() -> u64 {
    10
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_metric() -> String {
    "all".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_timeout(),
            history_capacity: default_history_capacity(),
            thresholds: ThresholdConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_metric: default_metric(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("demeter")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from a specific path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Current value of a key, as shown by `config get`.
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::Url => self.backend_url.clone(),
            ConfigKey::Interval => self.poll_interval_secs.to_string(),
            ConfigKey::Timeout => self.request_timeout_secs.to_string(),
            ConfigKey::HistoryCapacity => self.history_capacity.to_string(),
            ConfigKey::Theme => self.dashboard.theme.clone(),
            ConfigKey::Metric => self.dashboard.default_metric.clone(),
        }
    }

    /// Validate and store a value for a key.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::Url => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    bail!("Invalid URL '{}'. Expected http:// or https://", value);
                }
                self.backend_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::Interval => self.poll_interval_secs = parse_positive(value, "interval")?,
            ConfigKey::Timeout => self.request_timeout_secs = parse_positive(value, "timeout")?,
            ConfigKey::HistoryCapacity => {
                self.history_capacity = parse_positive(value, "history capacity")? as usize
            }
            ConfigKey::Theme => match value.to_lowercase().as_str() {
                theme @ ("dark" | "light") => self.dashboard.theme = theme.to_string(),
                _ => bail!("Invalid theme '{}'. Valid values: dark, light", value),
            },
            ConfigKey::Metric => {
                parse_metric_choice(value)?;
                self.dashboard.default_metric = value.to_lowercase();
            }
        }
        Ok(())
    }

    /// Reset a key to its default value.
    pub fn unset(&mut self, key: ConfigKey) {
        let defaults = Config::default();
        match key {
            ConfigKey::Url => self.backend_url = defaults.backend_url,
            ConfigKey::Interval => self.poll_interval_secs = defaults.poll_interval_secs,
            ConfigKey::Timeout => self.request_timeout_secs = defaults.request_timeout_secs,
            ConfigKey::HistoryCapacity => self.history_capacity = defaults.history_capacity,
            ConfigKey::Theme => self.dashboard.theme = defaults.dashboard.theme,
            ConfigKey::Metric => self.dashboard.default_metric = defaults.dashboard.default_metric,
        }
    }

    /// The metric the trend chart starts on; `None` shows every metric.
    pub fn default_metric(&self) -> Option<Metric> {
        parse_metric_choice(&self.dashboard.default_metric).unwrap_or(None)
    }
}

fn parse_positive(value: &str, name: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("Invalid {} '{}'. Expected a positive whole number", name, value),
    }
}

/// Parse "all" or a metric name.
pub fn parse_metric_choice(value: &str) -> Result<Option<Metric>> {
    if value.trim().eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    value
        .parse::<Metric>()
        .map(Some)
        .map_err(|e| anyhow::anyhow!("{}. Valid values: temp, ph, ec, all", e))
}

/// Resolve backend URL: explicit flag or env var first, then config.
pub fn resolve_backend_url(url: Option<String>, config: &Config) -> String {
    url.filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| config.backend_url.clone())
}

/// Resolve timeout: use provided value, fall back to config, then default
pub fn resolve_timeout(cmd_timeout: u64, config: &Config, default: u64) -> Duration {
    // If the command timeout differs from clap's default, use it
    let secs = if cmd_timeout != default {
        cmd_timeout
    } else {
        config.request_timeout_secs
    };
    Duration::from_secs(secs.max(1))
}

/// Resolve polling interval: explicit flag, then config.
pub fn resolve_interval(interval: Option<u64>, config: &Config) -> Duration {
    Duration::from_secs(interval.unwrap_or(config.poll_interval_secs).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.history_capacity, 7);
        assert_eq!(config.dashboard.theme, "dark");
        assert_eq!(config.default_metric(), None);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            backend_url = "http://raspberrypi.local:5000"

            [thresholds.temperature]
            hot_min = 28.0
            "#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://raspberrypi.local:5000");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.thresholds.temperature.hot_min, 28.0);
        assert_eq!(config.thresholds.temperature.cold_max, 17.5);
        assert_eq!(config.thresholds.ph.neutral_max, 7.5);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set(ConfigKey::Interval, "30").unwrap();
        config.set(ConfigKey::Metric, "pH").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.default_metric(), Some(Metric::Ph));
    }

    #[test]
    fn test_load_missing_or_invalid_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(Config::load_from(&missing), Config::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "poll_interval_secs = \"soon\"").unwrap();
        assert_eq!(Config::load_from(&broken), Config::default());
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        assert!(config.set(ConfigKey::Url, "localhost:5000").is_err());
        assert!(config.set(ConfigKey::Interval, "0").is_err());
        assert!(config.set(ConfigKey::Timeout, "-5").is_err());
        assert!(config.set(ConfigKey::Theme, "neon").is_err());
        assert!(config.set(ConfigKey::Metric, "humidity").is_err());
        assert_eq!(config, Config::default());

        config.set(ConfigKey::Url, "http://pi:5000/").unwrap();
        assert_eq!(config.get(ConfigKey::Url), "http://pi:5000");
        config.set(ConfigKey::Theme, "LIGHT").unwrap();
        assert_eq!(config.get(ConfigKey::Theme), "light");
    }

    #[test]
    fn test_unset_restores_default() {
        let mut config = Config::default();
        config.set(ConfigKey::HistoryCapacity, "14").unwrap();
        assert_eq!(config.history_capacity, 14);
        config.unset(ConfigKey::HistoryCapacity);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_resolve_backend_url_prefers_arg() {
        let config = Config {
            backend_url: "http://config:5000".to_string(),
            ..Default::default()
        };
        assert_eq!(
            resolve_backend_url(Some("http://arg:5000".to_string()), &config),
            "http://arg:5000"
        );
        assert_eq!(resolve_backend_url(None, &config), "http://config:5000");
        assert_eq!(
            resolve_backend_url(Some("  ".to_string()), &config),
            "http://config:5000"
        );
    }

    #[test]
    fn test_resolve_timeout_uses_explicit_value() {
        let config = Config {
            request_timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(resolve_timeout(45, &config, 10), Duration::from_secs(45));
    }

    #[test]
    fn test_resolve_timeout_uses_config_when_default() {
        let config = Config {
            request_timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(resolve_timeout(10, &config, 10), Duration::from_secs(60));
    }

    #[test]
    fn test_resolve_interval() {
        let config = Config {
            poll_interval_secs: 30,
            ..Default::default()
        };
        assert_eq!(resolve_interval(None, &config), Duration::from_secs(30));
        assert_eq!(resolve_interval(Some(5), &config), Duration::from_secs(5));
        assert_eq!(resolve_interval(Some(0), &config), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_metric_choice() {
        assert_eq!(parse_metric_choice("all").unwrap(), None);
        assert_eq!(parse_metric_choice("ALL").unwrap(), None);
        assert_eq!(parse_metric_choice("temp").unwrap(), Some(Metric::Temperature));
        assert_eq!(parse_metric_choice("ec").unwrap(), Some(Metric::Ec));
        assert!(parse_metric_choice("co2").is_err());
    }
}
