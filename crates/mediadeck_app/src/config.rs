use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mediadeck_engine::ClientConfig;
use mediadeck_logging::{deck_info, deck_warn};
use ron::extensions::Extensions;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "mediadeck.ron";
pub const BASE_URL_ENV: &str = "MEDIADECK_BASE_URL";

/// On-disk settings. Every field is optional; absent ones keep the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub full_refresh_secs: Option<u64>,
    pub progress_millis: Option<u64>,
    pub optimistic_window_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

/// Read the config file. An explicit path that cannot be read or parsed,
/// or a malformed default file, falls back to defaults with a warning.
pub fn load_config_file(explicit: Option<&Path>) -> ConfigFile {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(CONFIG_FILENAME),
    };
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            return ConfigFile::default();
        }
        Err(err) => {
            deck_warn!("Failed to read config from {:?}: {}", path, err);
            return ConfigFile::default();
        }
    };

    let options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
    match options.from_str(&content) {
        Ok(file) => {
            deck_info!("Loaded config from {:?}", path);
            file
        }
        Err(err) => {
            deck_warn!("Failed to parse config from {:?}: {}", path, err);
            ConfigFile::default()
        }
    }
}

/// Merge defaults, file values, the environment and the command-line flag,
/// in increasing order of precedence.
pub fn resolve_config(
    file: &ConfigFile,
    env_base_url: Option<String>,
    flag_base_url: Option<String>,
) -> ClientConfig {
    let mut config = ClientConfig::default();

    if let Some(url) = &file.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = file.full_refresh_secs.filter(|secs| *secs > 0) {
        config.full_refresh_interval = Duration::from_secs(secs);
    }
    if let Some(millis) = file.progress_millis.filter(|millis| *millis > 0) {
        config.progress_interval = Duration::from_millis(millis);
    }
    if let Some(secs) = file.optimistic_window_secs {
        config.optimistic_window = Duration::from_secs(secs);
    }
    if let Some(secs) = file.request_timeout_secs.filter(|secs| *secs > 0) {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.connect_timeout_secs.filter(|secs| *secs > 0) {
        config.connect_timeout = Duration::from_secs(secs);
    }

    let override_url = flag_base_url
        .or(env_base_url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    if let Some(url) = override_url {
        config.base_url = url;
    }
    config
}
