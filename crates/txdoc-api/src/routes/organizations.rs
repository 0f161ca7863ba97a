//! # Organization Association API
//!
//! Records listed by the organization that requested them or the
//! organization they are about. Soft-deleted records are hidden unless
//! `include_deleted=true`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use txdoc_core::{FiscalYear, OrganizationId, ValidationError};
use txdoc_records::RecordFilter;
use txdoc_state::RequestStatus;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::routes::records::RecordResponse;
use crate::state::AppState;

/// Query parameters for the association listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordQuery {
    /// Only records for this fiscal year.
    pub fiscal_year: Option<i32>,
    /// Only records in this status.
    pub request_status: Option<String>,
    /// Also return soft-deleted records.
    pub include_deleted: Option<bool>,
}

impl RecordQuery {
    fn into_filter(self) -> Result<RecordFilter, ValidationError> {
        Ok(RecordFilter {
            fiscal_year: self.fiscal_year.map(FiscalYear::new).transpose()?,
            request_status: self
                .request_status
                .as_deref()
                .map(str::parse::<RequestStatus>)
                .transpose()?,
            include_deleted: self.include_deleted.unwrap_or(false),
        })
    }
}

/// Build the organization association router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/organizations/:org_id/requested-records",
            get(list_requested_records),
        )
        .route(
            "/v1/organizations/:org_id/subject-records",
            get(list_subject_records),
        )
}

/// GET /v1/organizations/:org_id/requested-records
#[utoipa::path(
    get,
    path = "/v1/organizations/{org_id}/requested-records",
    params(
        ("org_id" = Uuid, Path, description = "Requesting organization ID"),
        RecordQuery,
    ),
    responses(
        (status = 200, description = "Records requested by the organization, oldest first", body = Vec<RecordResponse>),
        (status = 422, description = "Invalid filter", body = crate::error::ErrorBody),
    ),
    tag = "organizations"
)]
pub(crate) async fn list_requested_records(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let filter = extract_query(query)?.into_filter()?;
    let records = state
        .records
        .find_by_requesting_organization(OrganizationId::from_uuid(org_id), &filter)
        .await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// GET /v1/organizations/:org_id/subject-records
#[utoipa::path(
    get,
    path = "/v1/organizations/{org_id}/subject-records",
    params(
        ("org_id" = Uuid, Path, description = "Subject organization ID"),
        RecordQuery,
    ),
    responses(
        (status = 200, description = "Records about the organization, oldest first", body = Vec<RecordResponse>),
        (status = 422, description = "Invalid filter", body = crate::error::ErrorBody),
    ),
    tag = "organizations"
)]
pub(crate) async fn list_subject_records(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let filter = extract_query(query)?.into_filter()?;
    let records = state
        .records
        .find_by_subject_organization(OrganizationId::from_uuid(org_id), &filter)
        .await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
