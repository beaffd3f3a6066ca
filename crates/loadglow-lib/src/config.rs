//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::device::Zone;
use crate::led::DEFAULT_HUE;
use crate::monitor::MonitorSettings;
use crate::reconnect::ReconnectPolicy;
use crate::stat::PROC_STAT_PATH;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Hue shown at full load, clamped to 0-255. Default: 20 (orange).
    #[serde(default = "default_hue", deserialize_with = "clamped_hue")]
    pub hue: u8,

    /// Milliseconds slept after each tick. Default: 1000.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Reopen attempts after a failed color write before giving up. Default: 10.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Milliseconds between reopen attempts. Default: 1000.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// CPU counter source. Default: "/proc/stat".
    #[serde(default = "default_stat_path")]
    pub stat_path: String,
}

fn default_hue() -> u8 {
    DEFAULT_HUE
}

/// Accept any integer hue and clamp it, like `--color` does.
fn clamped_hue<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, i64::from(u8::MAX)) as u8)
}

fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_retry_attempts() -> u32 {
    10
}
fn default_retry_delay_ms() -> u64 {
    1000
}
fn default_stat_path() -> String {
    PROC_STAT_PATH.into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hue: default_hue(),
            tick_interval_ms: default_tick_interval_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            stat_path: default_stat_path(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    ZeroTickInterval,
    ZeroRetryAttempts,
    EmptyStatPath,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ZeroTickInterval => write!(f, "tick_interval_ms must be > 0"),
            ValidationError::ZeroRetryAttempts => write!(f, "retry_attempts must be > 0"),
            ValidationError::EmptyStatPath => write!(f, "stat_path cannot be empty"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("loadglow"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.tick_interval_ms == 0 {
            errors.push(ValidationError::ZeroTickInterval);
        }
        if self.retry_attempts == 0 {
            errors.push(ValidationError::ZeroRetryAttempts);
        }
        if self.stat_path.trim().is_empty() {
            errors.push(ValidationError::EmptyStatPath);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all errors into one [`crate::LoadglowError::Config`].
    pub fn validated(&self) -> crate::error::Result<()> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            crate::LoadglowError::Config(msgs.join("; "))
        })
    }

    /// Reconnect policy described by this config.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.retry_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Monitor settings described by this config, driving every zone.
    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            hue: self.hue,
            tick: Duration::from_millis(self.tick_interval_ms),
            zones: Zone::ALL.to_vec(),
            reconnect: self.reconnect_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Config defaults ──

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.hue, 20);
        assert_eq!(c.tick_interval_ms, 1000);
        assert_eq!(c.retry_attempts, 10);
        assert_eq!(c.retry_delay_ms, 1000);
        assert_eq!(c.stat_path, "/proc/stat");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: Config = toml::from_str("hue = 85").unwrap();
        assert_eq!(c.hue, 85);
        assert_eq!(c.tick_interval_ms, 1000);
        assert_eq!(c.retry_attempts, 10);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let c: Config = toml::from_str("").unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn out_of_range_hue_is_clamped() {
        let c: Config = toml::from_str("hue = 300").unwrap();
        assert_eq!(c.hue, 255);
        let c: Config = toml::from_str("hue = -4").unwrap();
        assert_eq!(c.hue, 0);
    }

    #[test]
    fn non_integer_hue_is_a_parse_error() {
        let result: std::result::Result<Config, _> = toml::from_str("hue = \"red\"");
        assert!(result.is_err());
    }

    #[test]
    fn config_path_ends_with_toml() {
        if let Some(p) = Config::path() {
            assert!(p.ends_with("loadglow/config.toml"));
        }
    }

    // ── load_from ──

    #[test]
    fn load_from_missing_file_gives_defaults_without_warning() {
        let dir = tempfile::tempdir().unwrap();
        let (c, warnings) = Config::load_from(&dir.path().join("nope.toml"));
        assert_eq!(c, Config::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn load_from_malformed_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is { not valid toml").unwrap();
        let (c, warnings) = Config::load_from(&path);
        assert_eq!(c, Config::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("config parse error"));
    }

    #[test]
    fn load_from_clamps_hue_and_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "hue = 300\nretry_attempts = 3\n").unwrap();
        let (c, warnings) = Config::load_from(&path);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(c.hue, 255);
        assert_eq!(c.retry_attempts, 3);
        assert_eq!(c.tick_interval_ms, 1000);
    }

    // ── validate ──

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert!(Config::default().validated().is_ok());
    }

    #[test]
    fn validate_collects_all_errors() {
        let c = Config {
            tick_interval_ms: 0,
            retry_attempts: 0,
            stat_path: "  ".into(),
            ..Config::default()
        };
        let errors = c.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroTickInterval,
                ValidationError::ZeroRetryAttempts,
                ValidationError::EmptyStatPath,
            ]
        );
    }

    #[test]
    fn validated_joins_messages() {
        let c = Config {
            tick_interval_ms: 0,
            retry_attempts: 0,
            ..Config::default()
        };
        let err = c.validated().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Config error: tick_interval_ms must be > 0; retry_attempts must be > 0"
        );
    }

    // ── conversions ──

    #[test]
    fn monitor_settings_from_config() {
        let c = Config {
            hue: 99,
            tick_interval_ms: 250,
            retry_attempts: 4,
            retry_delay_ms: 100,
            ..Config::default()
        };
        let s = c.monitor_settings();
        assert_eq!(s.hue, 99);
        assert_eq!(s.tick, Duration::from_millis(250));
        assert_eq!(s.zones, Zone::ALL.to_vec());
        assert_eq!(s.reconnect.max_attempts, 4);
        assert_eq!(s.reconnect.delay, Duration::from_millis(100));
    }

    #[test]
    fn default_config_matches_default_settings() {
        let from_config = Config::default().monitor_settings();
        let defaults = MonitorSettings::default();
        assert_eq!(from_config.hue, defaults.hue);
        assert_eq!(from_config.tick, defaults.tick);
        assert_eq!(from_config.reconnect, defaults.reconnect);
    }
}
