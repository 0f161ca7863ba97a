//! # Application State
//!
//! Shared state for the Axum application, passed to every handler via the
//! `State` extractor.
//!
//! AppState holds the compliance record service, which in turn owns the
//! record store (in-memory or Postgres) and the organization directory
//! (in-memory or HTTP). Organization data itself is never stored here.

use std::sync::Arc;

use sqlx::PgPool;

use txdoc_core::ValidationError;
use txdoc_directory::{InMemoryDirectory, OrganizationDirectory};
use txdoc_records::{ComplianceRecords, MemoryRecordStore, RecordStore};
use txdoc_state::{RequestStatus, StatusPolicy, StatusWorkflow};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub status_policy: StatusPolicy,
    /// Enabled request statuses. `None` enables all of them.
    pub enabled_statuses: Option<Vec<RequestStatus>>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            status_policy: StatusPolicy::default(),
            enabled_statuses: None,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `TXDOC_STATUS_POLICY` (`value_domain` | `sequential`, default: `value_domain`)
    /// - `TXDOC_ENABLED_STATUSES` (comma-separated, default: all)
    /// - `LOG_FORMAT` (`json` for JSON logs, default: text)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => 8080,
        };
        let status_policy = match lookup("TXDOC_STATUS_POLICY") {
            Some(raw) => raw.parse()?,
            None => StatusPolicy::default(),
        };
        let enabled_statuses = lookup("TXDOC_ENABLED_STATUSES")
            .map(|raw| StatusWorkflow::parse_enabled(&raw))
            .transpose()?;
        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            port,
            status_policy,
            enabled_statuses,
            log_format,
        })
    }

    /// The status workflow this configuration describes.
    pub fn workflow(&self) -> StatusWorkflow {
        let workflow = StatusWorkflow::new(self.status_policy);
        match &self.enabled_statuses {
            Some(enabled) => workflow.with_enabled(enabled.iter().copied()),
            None => workflow,
        }
    }
}

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: \"{0}\"")]
    InvalidPort(String),
    #[error(transparent)]
    Workflow(#[from] ValidationError),
    #[error(transparent)]
    Directory(#[from] txdoc_directory::ConfigError),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub records: ComplianceRecords,
    /// Postgres pool, when `DATABASE_URL` is configured. Used by readiness.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// In-memory store and an empty in-memory directory.
    pub fn new() -> Self {
        Self::with_backends(
            AppConfig::default(),
            Arc::new(MemoryRecordStore::new()),
            Arc::new(InMemoryDirectory::new()),
            None,
        )
    }

    /// State over explicit store and directory backends.
    pub fn with_backends(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn OrganizationDirectory>,
        db_pool: Option<PgPool>,
    ) -> Self {
        let records = ComplianceRecords::new(store, directory, config.workflow());
        Self {
            config,
            records,
            db_pool,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.status_policy, StatusPolicy::ValueDomain);
        assert!(cfg.enabled_statuses.is_none());
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.workflow(), StatusWorkflow::default());
    }

    #[test]
    fn reads_all_keys() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("TXDOC_STATUS_POLICY", "sequential"),
            ("TXDOC_ENABLED_STATUSES", "NOT_REQUESTED,RECEIVED"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.status_policy, StatusPolicy::Sequential);
        assert_eq!(cfg.log_format, LogFormat::Json);
        let wf = cfg.workflow();
        assert!(!wf.is_enabled(RequestStatus::Requested));
        assert!(wf.is_enabled(RequestStatus::Received));
    }

    #[test]
    fn invalid_values_fail() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("TXDOC_STATUS_POLICY", "strict")])),
            Err(ConfigError::Workflow(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("TXDOC_ENABLED_STATUSES", "ARCHIVED")])),
            Err(ConfigError::Workflow(_))
        ));
    }
}
