//! # Compliance Record Service
//!
//! Entry point for every record operation. Each write follows the same
//! sequence: validate fields, check organization references, then persist
//! in a single store call. A failure at any step leaves the store as it was.

use std::sync::Arc;

use chrono::Utc;

use txdoc_core::{OrganizationId, OrganizationRole, RecordId};
use txdoc_directory::{Organization, OrganizationDirectory};
use txdoc_state::StatusWorkflow;

use crate::error::RecordError;
use crate::integrity::ReferenceResolver;
use crate::query::RecordFilter;
use crate::record::{ComplianceRecord, NewComplianceRecord, RecordPatch};
use crate::store::{FieldChanges, GuardedWrite, RecordStore};

/// Record service. Cheap to clone; every handle shares the same store,
/// directory, and workflow.
#[derive(Clone)]
pub struct ComplianceRecords {
    store: Arc<dyn RecordStore>,
    resolver: ReferenceResolver,
    workflow: Arc<StatusWorkflow>,
}

impl std::fmt::Debug for ComplianceRecords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceRecords")
            .field("workflow", &self.workflow)
            .finish_non_exhaustive()
    }
}

impl ComplianceRecords {
    pub fn new(
        store: Arc<dyn RecordStore>,
        directory: Arc<dyn OrganizationDirectory>,
        workflow: StatusWorkflow,
    ) -> Self {
        Self {
            store,
            resolver: ReferenceResolver::new(directory),
            workflow: Arc::new(workflow),
        }
    }

    pub fn workflow(&self) -> &StatusWorkflow {
        &self.workflow
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Validate a draft, check both organizations exist, and persist a new
    /// record in `NOT_REQUESTED`.
    pub async fn create(&self, draft: NewComplianceRecord) -> Result<ComplianceRecord, RecordError> {
        let validated = draft.validate().map_err(|e| {
            tracing::warn!(error = %e, "compliance record rejected");
            e
        })?;

        for role in [OrganizationRole::Requesting, OrganizationRole::Subject] {
            let id = match role {
                OrganizationRole::Requesting => validated.requesting_organization_id,
                OrganizationRole::Subject => validated.subject_organization_id,
            };
            self.resolver
                .require_exists(role, id)
                .await
                .map_err(|e| {
                    tracing::warn!(organization_id = %id, %role, error = %e, "compliance record rejected");
                    e
                })?;
        }

        let record = validated.into_record(Utc::now());
        self.store.insert(&record).await?;

        tracing::info!(
            record_id = %record.id,
            fiscal_year = %record.fiscal_year,
            request_status = %record.request_status,
            requesting_organization_id = %record.requesting_organization_id,
            subject_organization_id = %record.subject_organization_id,
            "compliance record created"
        );
        Ok(record)
    }

    /// Apply a patch to the record behind `record`.
    ///
    /// The patch is applied to the persisted state, and every invariant is
    /// re-checked before writing. `record` is overwritten only on success.
    pub async fn update(
        &self,
        record: &mut ComplianceRecord,
        patch: RecordPatch,
    ) -> Result<(), RecordError> {
        *record = self.update_by_id(record.id, patch).await?;
        Ok(())
    }

    /// [`update`](Self::update) addressed by id.
    ///
    /// The delete check is repeated by the store in the same step as the
    /// write, so a soft delete that lands between the read and the write
    /// wins and the update fails with [`RecordError::Deleted`].
    pub async fn update_by_id(
        &self,
        id: RecordId,
        patch: RecordPatch,
    ) -> Result<ComplianceRecord, RecordError> {
        let current = self.load(id).await?;
        if current.is_deleted() {
            tracing::warn!(record_id = %id, "update rejected: record is deleted");
            return Err(RecordError::Deleted(id));
        }

        let next = current
            .apply_patch(&patch, &self.workflow, Utc::now())
            .map_err(|e| {
                tracing::warn!(
                    record_id = %id,
                    request_status = %current.request_status,
                    policy = %self.workflow.policy(),
                    error = %e,
                    "compliance record update rejected"
                );
                e
            })?;

        let changes = FieldChanges {
            request_status: next.request_status,
            document_link: next.document_link,
            updated_at: next.updated_at,
        };
        let stored = match self.store.update_fields(id, &changes).await? {
            GuardedWrite::Applied(stored) => stored,
            GuardedWrite::AlreadyDeleted(_) => {
                tracing::warn!(record_id = %id, "update rejected: record was deleted concurrently");
                return Err(RecordError::Deleted(id));
            }
            GuardedWrite::Missing => return Err(RecordError::NotFound(id)),
        };

        tracing::info!(
            record_id = %id,
            fiscal_year = %stored.fiscal_year,
            request_status = %stored.request_status,
            "compliance record updated"
        );
        Ok(stored)
    }

    /// Mark the record deleted. Neither referenced organization is touched.
    ///
    /// Deleting an already-deleted record keeps the original `deleted_at`.
    pub async fn soft_delete(&self, record: &mut ComplianceRecord) -> Result<(), RecordError> {
        *record = self.soft_delete_by_id(record.id).await?;
        Ok(())
    }

    /// [`soft_delete`](Self::soft_delete) addressed by id.
    pub async fn soft_delete_by_id(&self, id: RecordId) -> Result<ComplianceRecord, RecordError> {
        match self.store.mark_deleted(id, Utc::now()).await? {
            GuardedWrite::Applied(stored) => {
                tracing::info!(
                    record_id = %id,
                    fiscal_year = %stored.fiscal_year,
                    request_status = %stored.request_status,
                    "compliance record soft-deleted"
                );
                Ok(stored)
            }
            GuardedWrite::AlreadyDeleted(stored) => {
                tracing::debug!(record_id = %id, "compliance record already deleted");
                Ok(stored)
            }
            GuardedWrite::Missing => Err(RecordError::NotFound(id)),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Re-read the persisted state into `record`.
    ///
    /// Works whatever the state of the referenced organizations.
    pub async fn reload(&self, record: &mut ComplianceRecord) -> Result<(), RecordError> {
        *record = self.load(record.id).await?;
        Ok(())
    }

    /// Look up a record by id, soft-deleted included.
    pub async fn get(&self, id: RecordId) -> Result<ComplianceRecord, RecordError> {
        self.load(id).await
    }

    /// Records requested by `org_id`, oldest first.
    pub async fn find_by_requesting_organization(
        &self,
        org_id: OrganizationId,
        filter: &RecordFilter,
    ) -> Result<Vec<ComplianceRecord>, RecordError> {
        self.find_by_organization(OrganizationRole::Requesting, org_id, filter)
            .await
    }

    /// Records about `org_id`, oldest first.
    pub async fn find_by_subject_organization(
        &self,
        org_id: OrganizationId,
        filter: &RecordFilter,
    ) -> Result<Vec<ComplianceRecord>, RecordError> {
        self.find_by_organization(OrganizationRole::Subject, org_id, filter)
            .await
    }

    async fn find_by_organization(
        &self,
        role: OrganizationRole,
        org_id: OrganizationId,
        filter: &RecordFilter,
    ) -> Result<Vec<ComplianceRecord>, RecordError> {
        let records = self.store.list_by_organization(role, org_id, filter).await?;
        tracing::debug!(organization_id = %org_id, %role, count = records.len(), "listed compliance records");
        Ok(records)
    }

    /// The requesting organization, soft-deleted or not.
    pub async fn get_requesting_organization(
        &self,
        record: &ComplianceRecord,
    ) -> Result<Organization, RecordError> {
        self.resolver
            .resolve(OrganizationRole::Requesting, record.requesting_organization_id)
            .await
    }

    /// The subject organization, soft-deleted or not.
    pub async fn get_subject_organization(
        &self,
        record: &ComplianceRecord,
    ) -> Result<Organization, RecordError> {
        self.resolver
            .resolve(OrganizationRole::Subject, record.subject_organization_id)
            .await
    }

    async fn load(&self, id: RecordId) -> Result<ComplianceRecord, RecordError> {
        let record = self.store.get(id).await?.ok_or(RecordError::NotFound(id))?;
        tracing::debug!(
            record_id = %id,
            fiscal_year = %record.fiscal_year,
            request_status = %record.request_status,
            "loaded compliance record"
        );
        Ok(record)
    }
}
