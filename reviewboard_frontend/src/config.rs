use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::api::DEFAULT_API_URL;
use crate::query::{RetryPolicy, DEFAULT_STALE_TIME};

pub const API_URL_ENV: &str = "REVIEWBOARD_API_URL";
pub const STALE_SECS_ENV: &str = "REVIEWBOARD_STALE_SECS";

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Review API root, including the version prefix.
    pub api_base_url: String,
    pub stale_time: Duration,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub token_path: PathBuf,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            stale_time: DEFAULT_STALE_TIME,
            request_timeout: Duration::from_secs(15),
            retry: RetryPolicy::default(),
            token_path: default_token_path(),
        }
    }
}

impl FrontendConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url;
        }
        if let Some(raw) = lookup(STALE_SECS_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.stale_time = Duration::from_secs(secs),
                Err(_) => warn!("ignoring {STALE_SECS_ENV}={raw:?}: not a number of seconds"),
            }
        }
        config
    }
}

fn default_token_path() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(".reviewboard").join("token")
    } else {
        PathBuf::from(".reviewboard").join("token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let config = FrontendConfig::from_lookup(|_| None);
        assert_eq!(config.api_base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.stale_time, Duration::from_secs(300));
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.token_path.ends_with(".reviewboard/token"));
    }

    #[test]
    fn environment_overrides() {
        let config = FrontendConfig::from_lookup(|name| match name {
            API_URL_ENV => Some("https://reviews.example.com/api/v1".into()),
            STALE_SECS_ENV => Some("60".into()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://reviews.example.com/api/v1");
        assert_eq!(config.stale_time, Duration::from_secs(60));
    }

    #[test]
    fn bad_stale_value_keeps_default() {
        let config = FrontendConfig::from_lookup(|name| {
            (name == STALE_SECS_ENV).then(|| "soon".to_string())
        });
        assert_eq!(config.stale_time, DEFAULT_STALE_TIME);
    }
}
