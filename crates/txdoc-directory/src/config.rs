//! Organization directory client configuration.
//!
//! Read from environment variables, or built explicitly for tests.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

use crate::retry::RetryPolicy;

/// Configuration for the HTTP organization directory.
///
/// Custom `Debug` implementation redacts the `api_token` field.
#[derive(Clone)]
pub struct DirectoryConfig {
    /// Base URL of the organization-info service.
    pub base_url: Url,
    /// Bearer token, zeroed on drop.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for unreachable or restarting directories.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `ORG_DIRECTORY_URL` is unset, meaning no
    /// remote directory is configured.
    ///
    /// Variables:
    /// - `ORG_DIRECTORY_URL`
    /// - `ORG_DIRECTORY_TOKEN` (required when the URL is set)
    /// - `ORG_DIRECTORY_TIMEOUT_SECS` (default: 30)
    /// - `ORG_DIRECTORY_MAX_RETRIES` (default: 3)
    /// - `ORG_DIRECTORY_RETRY_BASE_MS` (default: 200)
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(raw_url) = lookup("ORG_DIRECTORY_URL") else {
            return Ok(None);
        };
        let base_url = parse_url("ORG_DIRECTORY_URL", &raw_url)?;
        let api_token = lookup("ORG_DIRECTORY_TOKEN")
            .map(Zeroizing::new)
            .ok_or(ConfigError::MissingToken)?;
        let timeout_secs = parse_number(&lookup, "ORG_DIRECTORY_TIMEOUT_SECS", 30)?;

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_retries: parse_number(&lookup, "ORG_DIRECTORY_MAX_RETRIES", defaults.max_retries)?,
            base_delay: Duration::from_millis(parse_number(
                &lookup,
                "ORG_DIRECTORY_RETRY_BASE_MS",
                defaults.base_delay.as_millis() as u64,
            )?),
        };

        Ok(Some(Self {
            base_url,
            api_token,
            timeout_secs,
            retry,
        }))
    }

    /// Configuration pointing at a local mock server.
    pub fn local_mock(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            api_token: Zeroizing::new(token.to_string()),
            timeout_secs: 5,
            retry: RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_millis(10),
            },
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var, raw)),
        None => Ok(default),
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ORG_DIRECTORY_TOKEN environment variable is required when ORG_DIRECTORY_URL is set")]
    MissingToken,
    #[error("ORG_DIRECTORY_TOKEN cannot be sent as an HTTP header value")]
    InvalidToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid {0}: \"{1}\" is not a non-negative integer")]
    InvalidNumber(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = DirectoryConfig::local_mock("http://127.0.0.1:9000", "test-token").unwrap();
        assert_eq!(cfg.api_token.as_str(), "test-token");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = DirectoryConfig::local_mock("http://127.0.0.1:9000", "s3cret").unwrap();
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("s3cret"));
    }

    #[test]
    fn rejects_invalid_url() {
        let err = DirectoryConfig::local_mock("not a url", "t").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(..)));
    }

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn absent_url_means_no_remote_directory() {
        assert!(DirectoryConfig::from_lookup(env(&[])).unwrap().is_none());
    }

    #[test]
    fn url_without_token_is_rejected() {
        let err = DirectoryConfig::from_lookup(env(&[("ORG_DIRECTORY_URL", "http://dir:8080")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn retry_defaults_and_overrides() {
        let cfg = DirectoryConfig::from_lookup(env(&[
            ("ORG_DIRECTORY_URL", "http://dir:8080"),
            ("ORG_DIRECTORY_TOKEN", "t"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.retry, RetryPolicy::default());

        let cfg = DirectoryConfig::from_lookup(env(&[
            ("ORG_DIRECTORY_URL", "http://dir:8080"),
            ("ORG_DIRECTORY_TOKEN", "t"),
            ("ORG_DIRECTORY_MAX_RETRIES", "0"),
            ("ORG_DIRECTORY_RETRY_BASE_MS", "50"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.retry.max_retries, 0);
        assert_eq!(cfg.retry.base_delay, Duration::from_millis(50));
    }

    #[test]
    fn non_numeric_retry_setting_is_rejected() {
        let err = DirectoryConfig::from_lookup(env(&[
            ("ORG_DIRECTORY_URL", "http://dir:8080"),
            ("ORG_DIRECTORY_TOKEN", "t"),
            ("ORG_DIRECTORY_MAX_RETRIES", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber("ORG_DIRECTORY_MAX_RETRIES", _)
        ));
    }
}
