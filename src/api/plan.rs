//! Plan preview endpoint
//!
//! POST /api/v1/plan synthesizes an interaction plan for a text without
//! touching admission state or running anything.

use super::error::ApiError;
use super::AppState;
use axum::{extract::Extension, routing::post, Json, Router};
use cadence_core::ActionPlan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub total_delay_ms: u64,
    #[serde(flatten)]
    pub plan: ActionPlan,
}

async fn preview_plan(
    Extension(state): Extension<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    if request.text.is_empty() {
        return Err(ApiError::bad_request("text must not be empty"));
    }
    let plan = state.pipeline.preview(&request.text)?;
    Ok(Json(PlanResponse {
        total_delay_ms: plan.total_delay_ms(),
        plan,
    }))
}

/// Plan preview routes
pub fn plan_routes() -> Router {
    Router::new().route("/api/v1/plan", post(preview_plan))
}
