//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "txdoc API: Compliance Document Tracking",
        version = "0.1.0",
        description = "Tracks tax-form collection obligations between requesting and subject organizations, per fiscal year.",
        license(name = "BUSL-1.1")
    ),
    paths(
        crate::routes::records::create_record,
        crate::routes::records::get_record,
        crate::routes::records::update_record,
        crate::routes::records::delete_record,
        crate::routes::records::get_requesting_organization,
        crate::routes::records::get_subject_organization,
        crate::routes::organizations::list_requested_records,
        crate::routes::organizations::list_subject_records,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::records::CreateRecordRequest,
        crate::routes::records::UpdateRecordRequest,
        crate::routes::records::RecordResponse,
        crate::routes::records::OrganizationResponse,
    )),
    tags(
        (name = "compliance-records", description = "Compliance record lifecycle"),
        (name = "organizations", description = "Records by organization"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
