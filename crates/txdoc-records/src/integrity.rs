//! # Referential Integrity
//!
//! Checks organization references against the directory. A reference is
//! valid for every lifecycle state of the organization except purged:
//! soft-deleted organizations resolve like active ones.
//!
//! No cascade is registered in either direction. Organization deletion is
//! never observed here, and a record never reaches back into the directory
//! to change an organization.

use std::sync::Arc;

use txdoc_core::{OrganizationId, OrganizationRole, ReferentialError};
use txdoc_directory::{Organization, OrganizationDirectory};

use crate::error::RecordError;

/// Resolves organization references through the directory.
#[derive(Clone)]
pub struct ReferenceResolver {
    directory: Arc<dyn OrganizationDirectory>,
}

impl std::fmt::Debug for ReferenceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver").finish_non_exhaustive()
    }
}

impl ReferenceResolver {
    pub fn new(directory: Arc<dyn OrganizationDirectory>) -> Self {
        Self { directory }
    }

    /// Fail with [`ReferentialError::UnknownOrganization`] unless the
    /// directory knows `id`.
    pub async fn require_exists(
        &self,
        role: OrganizationRole,
        id: OrganizationId,
    ) -> Result<(), RecordError> {
        if self.directory.exists(id).await? {
            Ok(())
        } else {
            Err(ReferentialError::UnknownOrganization { role, id }.into())
        }
    }

    /// Full organization for an existing reference, regardless of its
    /// delete flag.
    ///
    /// A reference that no longer resolves was purged after the record was
    /// created and fails with [`ReferentialError::Orphaned`].
    pub async fn resolve(
        &self,
        role: OrganizationRole,
        id: OrganizationId,
    ) -> Result<Organization, RecordError> {
        match self.directory.get(id).await? {
            Some(org) => Ok(org),
            None => {
                tracing::error!(organization_id = %id, %role, "record references a purged organization");
                Err(ReferentialError::Orphaned { role, id }.into())
            }
        }
    }
}
