use std::fs;
use std::time::Duration;

use mediadeck_app::config::{load_config_file, resolve_config, ConfigFile};
use mediadeck_engine::{ClientConfig, DEFAULT_BASE_URL};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn missing_explicit_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let file = load_config_file(Some(dir.path().join("absent.ron").as_path()));
    assert_eq!(file, ConfigFile::default());
    assert_eq!(resolve_config(&file, None, None), ClientConfig::default());
}

#[test]
fn ron_file_values_are_applied() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mediadeck.ron");
    fs::write(
        &path,
        r#"(
    base_url: "http://nas.local:5000",
    full_refresh_secs: 10,
    progress_millis: 1500,
    optimistic_window_secs: 20,
)"#,
    )
    .unwrap();

    let file = load_config_file(Some(path.as_path()));
    assert_eq!(file.base_url.as_deref(), Some("http://nas.local:5000"));

    let config = resolve_config(&file, None, None);
    assert_eq!(config.base_url, "http://nas.local:5000");
    assert_eq!(config.full_refresh_interval, Duration::from_secs(10));
    assert_eq!(config.progress_interval, Duration::from_millis(1500));
    assert_eq!(config.optimistic_window, Duration::from_secs(20));
    assert_eq!(config.request_timeout, ClientConfig::default().request_timeout);
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.ron");
    fs::write(&path, "(base_url: 42, colour: \"blue\"").unwrap();

    assert_eq!(load_config_file(Some(path.as_path())), ConfigFile::default());
}

#[test]
fn flag_beats_environment_beats_file() {
    let file = ConfigFile {
        base_url: Some("http://from-file:5000".to_string()),
        ..ConfigFile::default()
    };

    let config = resolve_config(&file, Some("http://from-env:5000".to_string()), None);
    assert_eq!(config.base_url, "http://from-env:5000");

    let config = resolve_config(
        &file,
        Some("http://from-env:5000".to_string()),
        Some("http://from-flag:5000".to_string()),
    );
    assert_eq!(config.base_url, "http://from-flag:5000");

    let config = resolve_config(&ConfigFile::default(), Some("   ".to_string()), None);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
}

#[test]
fn zero_intervals_in_file_are_ignored() {
    let file = ConfigFile {
        full_refresh_secs: Some(0),
        progress_millis: Some(0),
        ..ConfigFile::default()
    };
    let config = resolve_config(&file, None, None);
    assert_eq!(config.full_refresh_interval, Duration::from_secs(30));
    assert_eq!(config.progress_interval, Duration::from_secs(3));
    assert!(config.validate().is_ok());
}
