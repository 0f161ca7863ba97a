//! # Compliance Record API
//!
//! Record lifecycle: create, read (soft-deleted included), partial update
//! of `request_status` / `document_link`, soft delete, and the two
//! organization associations.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use txdoc_core::{OrganizationId, RecordId};
use txdoc_directory::Organization;
use txdoc_records::{ComplianceRecord, NewComplianceRecord, RecordPatch};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;

// ── DTOs ────────────────────────────────────────────────────────────

/// Request to create a compliance record.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation error naming it.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateRecordRequest {
    /// Fiscal year, 2015 or later.
    pub fiscal_year: Option<i32>,
    /// Defaults to `US_TAX_FORM`.
    pub document_type: Option<String>,
    pub requesting_organization_id: Option<Uuid>,
    pub subject_organization_id: Option<Uuid>,
}

impl From<CreateRecordRequest> for NewComplianceRecord {
    fn from(req: CreateRecordRequest) -> Self {
        Self {
            fiscal_year: req.fiscal_year,
            document_type: req.document_type,
            requesting_organization_id: req.requesting_organization_id.map(OrganizationId::from_uuid),
            subject_organization_id: req.subject_organization_id.map(OrganizationId::from_uuid),
        }
    }
}

/// Partial update. Only the two mutable fields are accepted.
///
/// `"document_link": null` clears the link; omitting it leaves it alone.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateRecordRequest {
    /// One of `NOT_REQUESTED`, `REQUESTED`, `RECEIVED`.
    #[serde(default)]
    pub request_status: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<String>)]
    pub document_link: Option<Option<String>>,
}

/// Distinguish an explicit `null` from an absent field.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl Validate for UpdateRecordRequest {
    fn validate(&self) -> Result<(), String> {
        if self.request_status.is_none() && self.document_link.is_none() {
            return Err("request must set request_status or document_link".to_string());
        }
        Ok(())
    }
}

impl From<UpdateRecordRequest> for RecordPatch {
    fn from(req: UpdateRecordRequest) -> Self {
        Self {
            request_status: req.request_status,
            document_link: req.document_link,
        }
    }
}

/// Compliance record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordResponse {
    pub id: Uuid,
    pub fiscal_year: i32,
    /// `US_TAX_FORM`.
    pub document_type: String,
    /// `NOT_REQUESTED`, `REQUESTED`, or `RECEIVED`.
    pub request_status: String,
    pub document_link: Option<String>,
    pub requesting_organization_id: Uuid,
    pub subject_organization_id: Uuid,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComplianceRecord> for RecordResponse {
    fn from(rec: ComplianceRecord) -> Self {
        Self {
            id: *rec.id.as_uuid(),
            fiscal_year: rec.fiscal_year.value(),
            document_type: rec.document_type.to_string(),
            request_status: rec.request_status.to_string(),
            document_link: rec.document_link,
            requesting_organization_id: *rec.requesting_organization_id.as_uuid(),
            subject_organization_id: *rec.subject_organization_id.as_uuid(),
            deleted_at: rec.deleted_at,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }
}

/// Organization as returned by the association endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub name: String,
    /// Set when the organization is soft-deleted in the directory.
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: *org.id.as_uuid(),
            name: org.name,
            deleted_at: org.deleted_at,
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the compliance records router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/compliance-records", axum::routing::post(create_record))
        .route(
            "/v1/compliance-records/:id",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .route(
            "/v1/compliance-records/:id/requesting-organization",
            get(get_requesting_organization),
        )
        .route(
            "/v1/compliance-records/:id/subject-organization",
            get(get_subject_organization),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/compliance-records: Create a compliance record.
#[utoipa::path(
    post,
    path = "/v1/compliance-records",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 422, description = "Validation or referential error", body = crate::error::ErrorBody),
        (status = 502, description = "Organization directory unavailable", body = crate::error::ErrorBody),
    ),
    tag = "compliance-records"
)]
pub(crate) async fn create_record(
    State(state): State<AppState>,
    body: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    let req = extract_json(body)?;
    let record = state.records.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /v1/compliance-records/:id: Get a record, soft-deleted included.
#[utoipa::path(
    get,
    path = "/v1/compliance-records/{id}",
    params(("id" = Uuid, Path, description = "Compliance record ID")),
    responses(
        (status = 200, description = "Record found", body = RecordResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorBody),
    ),
    tag = "compliance-records"
)]
pub(crate) async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecordResponse>, AppError> {
    let record = state.records.get(RecordId::from_uuid(id)).await?;
    Ok(Json(record.into()))
}

/// PATCH /v1/compliance-records/:id: Update status and/or document link.
#[utoipa::path(
    patch,
    path = "/v1/compliance-records/{id}",
    params(("id" = Uuid, Path, description = "Compliance record ID")),
    request_body = UpdateRecordRequest,
    responses(
        (status = 200, description = "Record updated", body = RecordResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorBody),
        (status = 409, description = "Record is deleted", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "compliance-records"
)]
pub(crate) async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateRecordRequest>, JsonRejection>,
) -> Result<Json<RecordResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let record = state
        .records
        .update_by_id(RecordId::from_uuid(id), req.into())
        .await?;
    Ok(Json(record.into()))
}

/// DELETE /v1/compliance-records/:id: Soft-delete a record.
#[utoipa::path(
    delete,
    path = "/v1/compliance-records/{id}",
    params(("id" = Uuid, Path, description = "Compliance record ID")),
    responses(
        (status = 200, description = "Record soft-deleted", body = RecordResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorBody),
    ),
    tag = "compliance-records"
)]
pub(crate) async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecordResponse>, AppError> {
    let record = state
        .records
        .soft_delete_by_id(RecordId::from_uuid(id))
        .await?;
    Ok(Json(record.into()))
}

/// GET /v1/compliance-records/:id/requesting-organization
#[utoipa::path(
    get,
    path = "/v1/compliance-records/{id}/requesting-organization",
    params(("id" = Uuid, Path, description = "Compliance record ID")),
    responses(
        (status = 200, description = "Requesting organization, soft-deleted or not", body = OrganizationResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorBody),
        (status = 422, description = "Organization purged from the directory", body = crate::error::ErrorBody),
    ),
    tag = "compliance-records"
)]
pub(crate) async fn get_requesting_organization(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrganizationResponse>, AppError> {
    let record = state.records.get(RecordId::from_uuid(id)).await?;
    let org = state.records.get_requesting_organization(&record).await?;
    Ok(Json(org.into()))
}

/// GET /v1/compliance-records/:id/subject-organization
#[utoipa::path(
    get,
    path = "/v1/compliance-records/{id}/subject-organization",
    params(("id" = Uuid, Path, description = "Compliance record ID")),
    responses(
        (status = 200, description = "Subject organization, soft-deleted or not", body = OrganizationResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorBody),
        (status = 422, description = "Organization purged from the directory", body = crate::error::ErrorBody),
    ),
    tag = "compliance-records"
)]
pub(crate) async fn get_subject_organization(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrganizationResponse>, AppError> {
    let record = state.records.get(RecordId::from_uuid(id)).await?;
    let org = state.records.get_subject_organization(&record).await?;
    Ok(Json(org.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_distinguishes_null_from_absent() {
        let absent: UpdateRecordRequest =
            serde_json::from_str(r#"{"request_status":"RECEIVED"}"#).unwrap();
        assert!(absent.document_link.is_none());

        let null: UpdateRecordRequest = serde_json::from_str(r#"{"document_link":null}"#).unwrap();
        assert_eq!(null.document_link, Some(None));

        let set: UpdateRecordRequest =
            serde_json::from_str(r#"{"document_link":"s3://bucket/w9.pdf"}"#).unwrap();
        assert_eq!(set.document_link, Some(Some("s3://bucket/w9.pdf".into())));
    }

    #[test]
    fn update_request_rejects_unknown_fields() {
        let err = serde_json::from_str::<UpdateRecordRequest>(r#"{"fiscal_year":2020}"#);
        assert!(err.is_err());
    }

    #[test]
    fn empty_update_fails_validation() {
        let req: UpdateRecordRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }
}
