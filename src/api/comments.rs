//! Comment publishing endpoint
//!
//! POST /api/v1/comments generates a comment for a post and publishes it
//! through the admission-gated pipeline.

use super::error::ApiError;
use super::AppState;
use axum::{extract::Extension, routing::post, Json, Router};
use cadence_core::{AdmissionSnapshot, ExecutionReport, PublishOutcome, PublishTask};
use cadence_llm::PostDescription;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Request body for POST /api/v1/comments
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    /// Page the comment is posted on
    pub target: String,
    /// Text of the post being answered
    pub post_description: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Response for a published comment
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub success: bool,
    pub status: &'static str,
    pub comment: String,
    pub daily_count: u32,
    pub report: ExecutionReport,
}

#[instrument(skip(state, request), fields(target_page = %request.target))]
async fn create_comment(
    Extension(state): Extension<AppState>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    if request.target.trim().is_empty() {
        return Err(ApiError::bad_request("target must not be empty"));
    }
    if request.post_description.trim().is_empty() {
        return Err(ApiError::bad_request("post_description must not be empty"));
    }

    // Skip the LLM call when the day is already used up
    let snapshot = state.pipeline.snapshot().await;
    if snapshot.remaining == 0 {
        return Err(ApiError::daily_limit(retry_after_reset(&snapshot)));
    }

    let mut post = PostDescription::new(request.post_description);
    if let Some(author) = request.author.filter(|a| !a.trim().is_empty()) {
        post = post.with_author(author);
    }

    let comment = state.generator.generate(&post).await?;
    info!(
        generator = state.generator.name(),
        chars = comment.chars().count(),
        "Comment generated"
    );

    let outcome = state
        .pipeline
        .publish(PublishTask::new(request.target, comment.clone()))
        .await?;

    match outcome {
        PublishOutcome::Published {
            report,
            daily_count,
        } => Ok(Json(CommentResponse {
            success: true,
            status: "published",
            comment,
            daily_count,
            report,
        })),
        PublishOutcome::Deferred { wait_ms } => Err(ApiError::deferred(wait_ms)),
        PublishOutcome::Denied { .. } => {
            let snapshot = state.pipeline.snapshot().await;
            Err(ApiError::daily_limit(retry_after_reset(&snapshot)))
        }
    }
}

/// Seconds from the snapshot until the daily counter resets
fn retry_after_reset(snapshot: &AdmissionSnapshot) -> Option<u64> {
    snapshot.resets_at.map(|at| {
        let secs = (at - snapshot.taken_at).num_seconds().max(0);
        u64::try_from(secs).unwrap_or(0)
    })
}

/// Comment routes
pub fn comments_routes() -> Router {
    Router::new().route("/api/v1/comments", post(create_comment))
}
