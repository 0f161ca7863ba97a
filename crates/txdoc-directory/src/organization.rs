//! Organization as returned by the organization-info service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use txdoc_core::OrganizationId;

/// A host or subject organization.
///
/// Fields beyond the ones modeled here are ignored on deserialization so the
/// client keeps working as the service schema grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    #[serde(alias = "legal_name")]
    pub name: String,
    /// Set once the directory soft-deletes the organization.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Organization {
    /// A new, active organization with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: OrganizationId::new(),
            name: name.into(),
            deleted_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Whether the organization has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_organization_is_active() {
        let org = Organization::new("Harbor Holdings");
        assert_eq!(org.name, "Harbor Holdings");
        assert!(!org.is_deleted());
    }

    #[test]
    fn deserializes_camel_case_with_deleted_at() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Closed Co",
            "deletedAt": "2024-03-01T00:00:00Z",
            "createdAt": "2020-01-01T00:00:00Z",
            "jurisdiction": "us-de"
        });
        let org: Organization = serde_json::from_value(json).unwrap();
        assert!(org.is_deleted());
        assert!(org.updated_at.is_none());
    }

    #[test]
    fn missing_timestamps_default_to_none() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "legal_name": "Alias Corp"
        });
        let org: Organization = serde_json::from_value(json).unwrap();
        assert_eq!(org.name, "Alias Corp");
        assert!(!org.is_deleted());
        assert!(org.created_at.is_none());
    }
}
