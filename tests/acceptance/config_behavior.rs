//! Configuration file handling.

use monoclock_common::config::{AppConfig, SourcePreference};
use std::io::Write;
use std::time::Duration;

/// A config file on disk round-trips through load.
#[test]
fn test_config_file_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [clock]
        source = "monotonic"

        [bench]
        iterations = 250
        interval = "2ms"
        "#
    )
    .unwrap();

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.clock.source, SourcePreference::Monotonic);
    assert_eq!(config.bench.iterations, 250);
    assert_eq!(config.bench.interval, Duration::from_millis(2));
}

/// A missing config file reports the path in the error.
#[test]
fn test_missing_config_file_errors() {
    let path = std::path::Path::new("/nonexistent/monoclock.toml");
    let err = AppConfig::from_file(path).unwrap_err();
    assert!(err.to_string().contains("monoclock.toml"));
}

/// Serialized defaults parse back to the same values.
#[test]
fn test_defaults_round_trip() {
    let config = AppConfig::default();
    let toml = config.to_toml().unwrap();
    let parsed = AppConfig::from_toml(&toml).unwrap();

    assert_eq!(parsed.clock.source, config.clock.source);
    assert_eq!(parsed.bench.iterations, config.bench.iterations);
    assert_eq!(parsed.bench.interval, config.bench.interval);
    assert_eq!(parsed.bench.percentiles, config.bench.percentiles);
}
