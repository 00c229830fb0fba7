use std::time::Duration;

use mediadeck_core::DEFAULT_OPTIMISTIC_WINDOW;
use url::Url;

use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Connection and pacing settings for one client session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub full_refresh_interval: Duration,
    pub progress_interval: Duration,
    pub optimistic_window: Duration,
    pub backoff_step: Duration,
    pub backoff_ceiling: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            full_refresh_interval: Duration::from_secs(30),
            progress_interval: Duration::from_secs(3),
            optimistic_window: DEFAULT_OPTIMISTIC_WINDOW,
            backoff_step: Duration::from_secs(1),
            backoff_ceiling: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Check the settings and return the parsed base URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: err.to_string(),
        })?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                message: "expected an http(s) URL".to_string(),
            });
        }

        let durations = [
            ("full_refresh_interval", self.full_refresh_interval),
            ("progress_interval", self.progress_interval),
            ("request_timeout", self.request_timeout),
            ("connect_timeout", self.connect_timeout),
        ];
        for (name, value) in durations {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(url)
    }
}
