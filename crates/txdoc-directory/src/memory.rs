//! Process-local organization directory.
//!
//! Used in development when no `ORG_DIRECTORY_URL` is configured, and by the
//! test suites of the record and API crates. `purge` exists only to exercise
//! the hard-delete edge case; the real directory never hard-deletes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use txdoc_core::OrganizationId;

use crate::{DirectoryError, Organization, OrganizationDirectory};

/// In-memory [`OrganizationDirectory`].
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    organizations: RwLock<HashMap<OrganizationId, Organization>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new active organization.
    pub fn register(&self, name: impl Into<String>) -> Organization {
        let org = Organization::new(name);
        self.insert(org.clone());
        org
    }

    /// Store an organization as given, replacing any previous entry.
    pub fn insert(&self, org: Organization) {
        self.organizations.write().insert(org.id, org);
    }

    /// Mark an organization as soft-deleted.
    ///
    /// Repeated calls keep the first `deleted_at`. Returns `None` for an
    /// unknown id.
    pub fn soft_delete(&self, id: OrganizationId) -> Option<Organization> {
        let mut orgs = self.organizations.write();
        let org = orgs.get_mut(&id)?;
        if org.deleted_at.is_none() {
            let now = Utc::now();
            org.deleted_at = Some(now);
            org.updated_at = Some(now);
        }
        Some(org.clone())
    }

    /// Physically remove an organization.
    pub fn purge(&self, id: OrganizationId) -> Option<Organization> {
        self.organizations.write().remove(&id)
    }

    /// Number of stored organizations, soft-deleted included.
    pub fn len(&self) -> usize {
        self.organizations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.read().is_empty()
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryDirectory {
    async fn exists(&self, id: OrganizationId) -> Result<bool, DirectoryError> {
        Ok(self.organizations.read().contains_key(&id))
    }

    async fn get(&self, id: OrganizationId) -> Result<Option<Organization>, DirectoryError> {
        Ok(self.organizations.read().get(&id).cloned())
    }
}
