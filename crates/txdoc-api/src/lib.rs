//! # txdoc-api — Compliance Document Tracking API
//!
//! HTTP surface over the compliance record service.
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |--------|--------|--------|
//! | `/v1/compliance-records/*` | [`routes::records`] | Record lifecycle and associations |
//! | `/v1/organizations/*` | [`routes::organizations`] | Records by organization |
//! | `/health/*` | this module | Liveness and readiness probes |
//! | `/openapi.json` | [`openapi`] | OpenAPI document |
//!
//! ## Backends
//!
//! Records are kept in Postgres when `DATABASE_URL` is set, in memory
//! otherwise. Organizations are looked up through the HTTP directory client
//! when `ORG_DIRECTORY_URL` is set, and an in-memory directory otherwise.

pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::records::router())
        .merge(routes::organizations::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http());

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api).with_state(state)
}

/// Liveness probe. Always 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. 503 while a configured database is unreachable.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = db::ping(pool).await {
            tracing::warn!(error = %e, "readiness check failed: database unreachable");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unavailable");
        }
    }
    (StatusCode::OK, "ready")
}
