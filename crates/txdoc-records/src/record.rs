//! # Compliance Record
//!
//! The record type, its creation draft, its partial-update patch, and the
//! validation functions that run before every write.
//!
//! Validation is explicit: [`NewComplianceRecord::validate`] and
//! [`ComplianceRecord::apply_patch`] return `Result<_, ValidationError>` and
//! are called by the service before anything reaches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use txdoc_core::{FiscalYear, OrganizationId, OrganizationRole, RecordId, ValidationError};
use txdoc_state::{DocumentType, RequestStatus, StatusWorkflow};

/// Longest accepted `document_link`, in characters.
pub const MAX_DOCUMENT_LINK_LEN: usize = 2048;

/// One tax-form collection obligation for one fiscal year between a
/// requesting (host) organization and a subject organization.
///
/// Both organization references are plain values. Nothing cascades from the
/// directory: deleting either organization leaves the record untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub id: RecordId,
    pub fiscal_year: FiscalYear,
    pub document_type: DocumentType,
    pub request_status: RequestStatus,
    pub document_link: Option<String>,
    pub requesting_organization_id: OrganizationId,
    pub subject_organization_id: OrganizationId,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplianceRecord {
    /// Whether the record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The organization referenced in the given role.
    pub fn organization_id(&self, role: OrganizationRole) -> OrganizationId {
        match role {
            OrganizationRole::Requesting => self.requesting_organization_id,
            OrganizationRole::Subject => self.subject_organization_id,
        }
    }

    /// Apply a patch, producing the next state of the record.
    ///
    /// `self` is left untouched; on error nothing about the record changes.
    pub fn apply_patch(
        &self,
        patch: &RecordPatch,
        workflow: &StatusWorkflow,
        now: DateTime<Utc>,
    ) -> Result<ComplianceRecord, ValidationError> {
        let mut next = self.clone();

        if let Some(raw) = patch.request_status.as_deref() {
            next.request_status = workflow.validate_change(self.request_status, raw)?;
        }
        if let Some(link) = &patch.document_link {
            validate_document_link(link.as_deref())?;
            next.document_link = link.clone();
        }

        next.updated_at = now;
        Ok(next)
    }
}

// ─── Creation ────────────────────────────────────────────────────────

/// Unvalidated input for record creation.
///
/// Every field is optional so that absence is reported as a
/// [`ValidationError`] rather than being impossible to express.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplianceRecord {
    pub fiscal_year: Option<i32>,
    /// Raw document type; defaults to `US_TAX_FORM` when absent.
    pub document_type: Option<String>,
    pub requesting_organization_id: Option<OrganizationId>,
    pub subject_organization_id: Option<OrganizationId>,
}

impl NewComplianceRecord {
    /// Draft for the usual case: both organizations and a fiscal year.
    pub fn new(
        fiscal_year: i32,
        requesting_organization_id: OrganizationId,
        subject_organization_id: OrganizationId,
    ) -> Self {
        Self {
            fiscal_year: Some(fiscal_year),
            document_type: None,
            requesting_organization_id: Some(requesting_organization_id),
            subject_organization_id: Some(subject_organization_id),
        }
    }

    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// Check every field-level rule. Organization existence is checked
    /// separately against the directory.
    pub fn validate(&self) -> Result<ValidatedDraft, ValidationError> {
        let fiscal_year = FiscalYear::require(self.fiscal_year)?;
        let requesting_organization_id =
            self.requesting_organization_id
                .ok_or(ValidationError::MissingOrganization {
                    role: OrganizationRole::Requesting,
                })?;
        let subject_organization_id =
            self.subject_organization_id
                .ok_or(ValidationError::MissingOrganization {
                    role: OrganizationRole::Subject,
                })?;
        let document_type = match self.document_type.as_deref() {
            Some(raw) => raw.parse()?,
            None => DocumentType::default(),
        };

        Ok(ValidatedDraft {
            fiscal_year,
            document_type,
            requesting_organization_id,
            subject_organization_id,
        })
    }
}

/// A creation draft that passed field validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub fiscal_year: FiscalYear,
    pub document_type: DocumentType,
    pub requesting_organization_id: OrganizationId,
    pub subject_organization_id: OrganizationId,
}

impl ValidatedDraft {
    /// Materialize the record with a fresh id and the workflow's initial
    /// status.
    pub fn into_record(self, now: DateTime<Utc>) -> ComplianceRecord {
        ComplianceRecord {
            id: RecordId::new(),
            fiscal_year: self.fiscal_year,
            document_type: self.document_type,
            request_status: StatusWorkflow::initial(),
            document_link: None,
            requesting_organization_id: self.requesting_organization_id,
            subject_organization_id: self.subject_organization_id,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ─── Update ──────────────────────────────────────────────────────────

/// Partial update of the two mutable fields.
///
/// `document_link: Some(None)` clears the link; `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    /// Raw status, parsed against the closed set on apply.
    pub request_status: Option<String>,
    pub document_link: Option<Option<String>>,
}

impl RecordPatch {
    pub fn request_status(status: impl Into<String>) -> Self {
        Self {
            request_status: Some(status.into()),
            document_link: None,
        }
    }

    pub fn document_link(link: impl Into<String>) -> Self {
        Self {
            request_status: None,
            document_link: Some(Some(link.into())),
        }
    }

    pub fn clear_document_link() -> Self {
        Self {
            request_status: None,
            document_link: Some(None),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.request_status.is_none() && self.document_link.is_none()
    }
}

/// Reject blank or oversized document links. `None` is always valid.
pub fn validate_document_link(link: Option<&str>) -> Result<(), ValidationError> {
    let Some(link) = link else {
        return Ok(());
    };
    if link.trim().is_empty() {
        return Err(ValidationError::InvalidDocumentLink(
            "must not be blank".to_string(),
        ));
    }
    let len = link.chars().count();
    if len > MAX_DOCUMENT_LINK_LEN {
        return Err(ValidationError::InvalidDocumentLink(format!(
            "{len} characters exceeds the maximum of {MAX_DOCUMENT_LINK_LEN}"
        )));
    }
    Ok(())
}
