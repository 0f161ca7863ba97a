//! Typed client for the organization-info service.
//!
//! | Method | Path (relative to base URL) | Operation |
//! |--------|-----------------------------|-----------|
//! | GET    | `/organization-info/api/v1/organization/{id}?includeDeleted=true` | Get by ID, soft-deleted included |

use std::time::Duration;

use async_trait::async_trait;

use txdoc_core::OrganizationId;

use crate::config::{ConfigError, DirectoryConfig};
use crate::retry::RetryPolicy;
use crate::{DirectoryError, Organization, OrganizationDirectory};

/// Context path and API version of the organization-info service.
const API_PREFIX: &str = "organization-info/api/v1";

/// HTTP-backed [`OrganizationDirectory`].
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    http: reqwest::Client,
    base_url: url::Url,
    retry: RetryPolicy,
}

impl HttpDirectory {
    /// Build a client with bearer authentication and the configured timeout.
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_token.as_str()
        ))
        .map_err(|_| DirectoryError::Config(ConfigError::InvalidToken))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| DirectoryError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            retry: config.retry,
        })
    }

    fn organization_url(&self, id: OrganizationId) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{API_PREFIX}/organization/{id}?includeDeleted=true")
    }
}

#[async_trait]
impl OrganizationDirectory for HttpDirectory {
    /// Calls `GET {base_url}/organization-info/api/v1/organization/{id}?includeDeleted=true`.
    async fn get(&self, id: OrganizationId) -> Result<Option<Organization>, DirectoryError> {
        let endpoint = format!("GET /organization/{id}");
        let url = self.organization_url(id);

        let resp = self
            .retry
            .send(&id.to_string(), || self.http.get(&url))
            .await
            .map_err(|e| DirectoryError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(organization_id = %id, "organization not found in directory");
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DirectoryError::Api {
                endpoint,
                status,
                body,
            });
        }

        let org = resp
            .json::<Organization>()
            .await
            .map_err(|e| DirectoryError::Deserialization {
                endpoint,
                source: e,
            })?;
        Ok(Some(org))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_prefix_and_deleted_flag() {
        let cfg = DirectoryConfig::local_mock("http://127.0.0.1:9000/", "t").unwrap();
        let client = HttpDirectory::new(cfg).unwrap();
        let id: OrganizationId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(
            client.organization_url(id),
            "http://127.0.0.1:9000/organization-info/api/v1/organization/550e8400-e29b-41d4-a716-446655440000?includeDeleted=true"
        );
    }

    #[test]
    fn token_with_newline_is_an_invalid_token() {
        let cfg = DirectoryConfig::local_mock("http://127.0.0.1:9000", "bad\ntoken").unwrap();
        assert!(matches!(
            HttpDirectory::new(cfg),
            Err(DirectoryError::Config(ConfigError::InvalidToken))
        ));
    }
}
