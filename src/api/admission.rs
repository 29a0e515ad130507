//! Admission status endpoint
//!
//! GET /api/v1/admission returns today's counters and spacing limits.

use super::AppState;
use axum::{extract::Extension, routing::get, Json, Router};
use cadence_core::AdmissionSnapshot;
use serde::Serialize;

/// Response for GET /api/v1/admission
#[derive(Debug, Serialize)]
pub struct AdmissionResponse {
    pub executor: String,
    #[serde(flatten)]
    pub snapshot: AdmissionSnapshot,
}

async fn get_admission(Extension(state): Extension<AppState>) -> Json<AdmissionResponse> {
    let snapshot = state.pipeline.snapshot().await;
    Json(AdmissionResponse {
        executor: state.pipeline.executor_name().to_string(),
        snapshot,
    })
}

/// Admission routes
pub fn admission_routes() -> Router {
    Router::new().route("/api/v1/admission", get(get_admission))
}
