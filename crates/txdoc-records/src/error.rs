//! Errors surfaced by the compliance record service.

use txdoc_core::{RecordId, ReferentialError, ValidationError};
use txdoc_directory::DirectoryError;

use crate::store::StoreError;

/// Failure of a record operation.
///
/// Validation and referential failures are the caller's fault. Directory
/// and storage failures are infrastructure faults.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A field is missing, malformed, or not allowed by the status workflow.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An organization reference does not resolve in the directory.
    #[error("referential integrity violated: {0}")]
    Referential(#[from] ReferentialError),

    /// No record with this id is persisted.
    #[error("compliance record {0} not found")]
    NotFound(RecordId),

    /// The record is soft-deleted and can no longer be changed.
    #[error("compliance record {0} is deleted")]
    Deleted(RecordId),

    /// The organization directory could not be reached or answered badly.
    #[error("organization directory unavailable: {0}")]
    Directory(#[from] DirectoryError),

    /// The record store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
