//! # txdoc-directory — Organization Directory
//!
//! The organization directory owns the host and subject organizations a
//! compliance record points at. This crate is the only path the record
//! store uses to learn about them.
//!
//! ## Soft Deletion
//!
//! Organizations are soft-deleted by the directory, never hard-deleted.
//! Every lookup here resolves soft-deleted organizations: a record created
//! against an organization keeps resolving it for its whole lifetime.
//! `None` means the organization never existed or was purged.
//!
//! ## Implementations
//!
//! - [`InMemoryDirectory`]: process-local directory for development and tests.
//! - [`HttpDirectory`]: typed client for the organization-info service.
//!
//! ## API Path Convention
//!
//! `{base_url}/organization-info/api/v1/organization/{id}?includeDeleted=true`

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod organization;
pub mod retry;

pub use client::HttpDirectory;
pub use config::{ConfigError, DirectoryConfig};
pub use error::DirectoryError;
pub use memory::InMemoryDirectory;
pub use organization::Organization;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use txdoc_core::OrganizationId;

/// Lookup interface onto the organization directory.
///
/// Both methods treat soft-deleted organizations as present.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// Whether the organization is known to the directory, in any lifecycle
    /// state other than purged.
    async fn exists(&self, id: OrganizationId) -> Result<bool, DirectoryError> {
        Ok(self.get(id).await?.is_some())
    }

    /// Fetch the organization regardless of its delete flag.
    async fn get(&self, id: OrganizationId) -> Result<Option<Organization>, DirectoryError>;
}
