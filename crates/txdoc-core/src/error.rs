//! # Error Hierarchy
//!
//! Structured error types for compliance record creation and mutation,
//! built with `thiserror`.
//!
//! Two families:
//!
//! - [`ValidationError`]: a malformed, missing, or out-of-range field.
//!   Always surfaced to the caller, never auto-corrected.
//! - [`ReferentialError`]: an organization reference that does not resolve
//!   in the organization directory.
//!
//! Soft-deleted organizations are never an error: they still resolve.

use thiserror::Error;

use crate::identity::{OrganizationId, OrganizationRole};

/// Field-level validation failures.
///
/// Each variant carries the rejected input so operators can diagnose a
/// bad request without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No fiscal year was supplied.
    #[error("fiscal_year is required")]
    FiscalYearMissing,

    /// The fiscal year predates the earliest supported year.
    #[error("fiscal_year {year} is below the earliest supported year {floor}")]
    FiscalYearBelowFloor {
        /// The rejected year.
        year: i32,
        /// The earliest supported year.
        floor: i32,
    },

    /// One of the two mandatory organization references is absent.
    #[error("{} is required", .role.field_name())]
    MissingOrganization {
        /// Which reference is missing.
        role: OrganizationRole,
    },

    /// The request status is not a member of the closed status set.
    #[error("unknown request_status \"{0}\" (expected one of NOT_REQUESTED, REQUESTED, RECEIVED)")]
    UnknownRequestStatus(String),

    /// The document type is not a member of the closed document-type set.
    #[error("unknown document_type \"{0}\" (expected US_TAX_FORM)")]
    UnknownDocumentType(String),

    /// The status exists but is disabled by the workflow configuration.
    #[error("request_status {0} is not enabled in this deployment")]
    StatusNotEnabled(String),

    /// The configured workflow policy does not allow this status change.
    #[error("request_status change from {from} to {to} is not allowed")]
    StatusTransitionRejected {
        /// Current status.
        from: String,
        /// Attempted status.
        to: String,
    },

    /// The document link is blank or too long.
    #[error("invalid document_link: {0}")]
    InvalidDocumentLink(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration value for {key}: \"{value}\"")]
    InvalidConfiguration {
        /// The configuration key.
        key: String,
        /// The rejected value.
        value: String,
    },
}

/// Organization reference resolution failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferentialError {
    /// The referenced organization does not exist in the directory.
    #[error("{role} organization {id} does not exist")]
    UnknownOrganization {
        /// Which reference failed.
        role: OrganizationRole,
        /// The unresolved identifier.
        id: OrganizationId,
    },

    /// A record references an organization that has since been purged.
    ///
    /// Organizations are expected to be soft-deleted only; this surfaces
    /// the case where that assumption was broken.
    #[error("{role} organization {id} has been purged from the directory")]
    Orphaned {
        /// Which reference is orphaned.
        role: OrganizationRole,
        /// The purged identifier.
        id: OrganizationId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fiscal_year_below_floor_display() {
        let err = ValidationError::FiscalYearBelowFloor {
            year: 2010,
            floor: 2015,
        };
        let msg = format!("{err}");
        assert!(msg.contains("2010"));
        assert!(msg.contains("2015"));
    }

    #[test]
    fn missing_organization_names_the_field() {
        let err = ValidationError::MissingOrganization {
            role: OrganizationRole::Subject,
        };
        assert_eq!(format!("{err}"), "subject_organization_id is required");
    }

    #[test]
    fn unknown_status_echoes_input() {
        let err = ValidationError::UnknownRequestStatus("APPROVED".to_string());
        assert!(format!("{err}").contains("APPROVED"));
    }

    #[test]
    fn transition_rejected_display() {
        let err = ValidationError::StatusTransitionRejected {
            from: "RECEIVED".to_string(),
            to: "REQUESTED".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("RECEIVED"));
        assert!(msg.contains("REQUESTED"));
    }

    #[test]
    fn unknown_organization_display() {
        let id = OrganizationId::new();
        let err = ReferentialError::UnknownOrganization {
            role: OrganizationRole::Requesting,
            id,
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("requesting organization"));
        assert!(msg.contains(&id.to_string()));
    }

    #[test]
    fn orphaned_display() {
        let err = ReferentialError::Orphaned {
            role: OrganizationRole::Subject,
            id: OrganizationId::new(),
        };
        assert!(format!("{err}").contains("purged"));
    }
}
