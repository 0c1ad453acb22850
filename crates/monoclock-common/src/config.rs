//! Configuration structures for the monoclock tools.
//!
//! Supports TOML deserialization with sensible defaults for
//! development and explicit values for deployment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Clock source selection.
    pub clock: ClockConfig,

    /// Sleep benchmark parameters.
    pub bench: BenchConfig,
}

/// Clock source selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClockConfig {
    /// Which raw time source to use.
    pub source: SourcePreference,
}

/// Raw time source preference.
///
/// `Auto` picks the highest-resolution source the host offers. Forcing
/// `WallClock` exists so the fallback path can be exercised on hosts that
/// do have a monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourcePreference {
    /// Prefer the monotonic source, fall back to the wall clock.
    #[default]
    Auto,
    /// Require the monotonic source; fail if the host has none.
    Monotonic,
    /// Force the wall-clock microsecond source.
    WallClock,
}

/// Sleep benchmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of measured sleep iterations.
    pub iterations: u32,

    /// Requested duration of each sleep.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Unmeasured iterations run before sampling starts.
    pub warmup: u32,

    /// Size of the overshoot histogram ring buffer.
    pub histogram_size: usize,

    /// Percentiles to report (e.g., [50, 90, 99, 99.9]).
    pub percentiles: Vec<f64>,

    /// Real-time elevation for the benchmark thread.
    pub realtime: RtConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            interval: Duration::from_millis(1),
            warmup: 10,
            histogram_size: 10_000,
            percentiles: vec![50.0, 90.0, 99.0, 99.9],
            realtime: RtConfig::default(),
        }
    }
}

/// Real-time scheduling elevation for benchmark accuracy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RtConfig {
    /// Elevate to SCHED_FIFO before the measured loop (requires privileges).
    pub enabled: bool,

    /// Scheduler priority (1-99).
    pub priority: u8,
}

impl Default for RtConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            priority: 90,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        tracing::debug!(?path, "Loading configuration file");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
