//! Compliance record persistence.
//!
//! Every write is one SQL statement against `compliance_records`. Field
//! updates and soft deletes carry `deleted_at IS NULL` in their `WHERE`
//! clause; when that matches nothing, a follow-up read tells a deleted
//! record apart from a missing one. Field updates on live records are
//! last-writer-wins; there is no version column. Validation happens in
//! `txdoc-records` before any of these run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use txdoc_core::{FiscalYear, OrganizationId, OrganizationRole, RecordId};
use txdoc_records::{
    ComplianceRecord, FieldChanges, GuardedWrite, RecordFilter, RecordStore, StoreError,
};

const COLUMNS: &str = "id, fiscal_year, document_type, request_status, document_link, \
     requesting_organization_id, subject_organization_id, deleted_at, created_at, updated_at";

/// Postgres-backed [`RecordStore`].
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Classify a guarded write that matched no live row.
    async fn not_applied(&self, id: RecordId) -> Result<GuardedWrite, StoreError> {
        Ok(match self.get(id).await? {
            Some(current) => GuardedWrite::AlreadyDeleted(current),
            None => GuardedWrite::Missing,
        })
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "compliance record query failed");
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, record: &ComplianceRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO compliance_records (id, fiscal_year, document_type, request_status, \
             document_link, requesting_organization_id, subject_organization_id, deleted_at, \
             created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(record.id.as_uuid())
        .bind(record.fiscal_year.value())
        .bind(record.document_type.as_str())
        .bind(record.request_status.as_str())
        .bind(&record.document_link)
        .bind(record.requesting_organization_id.as_uuid())
        .bind(record.subject_organization_id.as_uuid())
        .bind(record.deleted_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                StoreError::Duplicate(record.id)
            } else {
                backend(e)
            }
        })?;

        Ok(())
    }

    async fn get(&self, id: RecordId) -> Result<Option<ComplianceRecord>, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {COLUMNS} FROM compliance_records WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(RecordRow::into_record).transpose()
    }

    async fn update_fields(
        &self,
        id: RecordId,
        changes: &FieldChanges,
    ) -> Result<GuardedWrite, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "UPDATE compliance_records
             SET request_status = $2, document_link = $3, updated_at = $4
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(changes.request_status.as_str())
        .bind(&changes.document_link)
        .bind(changes.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(row) => Ok(GuardedWrite::Applied(row.into_record()?)),
            None => self.not_applied(id).await,
        }
    }

    async fn mark_deleted(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<GuardedWrite, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "UPDATE compliance_records
             SET deleted_at = $2, updated_at = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        match row {
            Some(row) => Ok(GuardedWrite::Applied(row.into_record()?)),
            None => self.not_applied(id).await,
        }
    }

    async fn list_by_organization(
        &self,
        role: OrganizationRole,
        org_id: OrganizationId,
        filter: &RecordFilter,
    ) -> Result<Vec<ComplianceRecord>, StoreError> {
        let column = match role {
            OrganizationRole::Requesting => "requesting_organization_id",
            OrganizationRole::Subject => "subject_organization_id",
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM compliance_records
             WHERE {column} = $1
               AND ($2::INTEGER IS NULL OR fiscal_year = $2)
               AND ($3::TEXT IS NULL OR request_status = $3)
               AND ($4 OR deleted_at IS NULL)
             ORDER BY created_at, id"
        );

        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(org_id.as_uuid())
            .bind(filter.fiscal_year.map(|y| y.value()))
            .bind(filter.request_status.map(|s| s.as_str()))
            .bind(filter.include_deleted)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct RecordRow {
    id: Uuid,
    fiscal_year: i32,
    document_type: String,
    request_status: String,
    document_link: Option<String>,
    requesting_organization_id: Uuid,
    subject_organization_id: Uuid,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecordRow {
    /// Decode a row. Values outside the closed sets are reported, never
    /// replaced by a default.
    fn into_record(self) -> Result<ComplianceRecord, StoreError> {
        let corrupt = |e: txdoc_core::ValidationError| {
            tracing::error!(id = %self.id, error = %e, "invalid compliance record row");
            StoreError::Backend(format!("invalid row {}: {e}", self.id))
        };

        Ok(ComplianceRecord {
            id: RecordId::from_uuid(self.id),
            fiscal_year: FiscalYear::new(self.fiscal_year).map_err(corrupt)?,
            document_type: self.document_type.parse().map_err(corrupt)?,
            request_status: self.request_status.parse().map_err(corrupt)?,
            document_link: self.document_link,
            requesting_organization_id: OrganizationId::from_uuid(self.requesting_organization_id),
            subject_organization_id: OrganizationId::from_uuid(self.subject_organization_id),
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
