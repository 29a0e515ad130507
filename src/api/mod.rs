//! Web API module for Cadence
//!
//! Provides REST API endpoints for:
//! - Comment generation and publishing
//! - Admission status
//! - Health checks

pub mod admission;
pub mod comments;
pub mod error;
pub mod health;
pub mod plan;

use axum::{Extension, Router};
use cadence_core::PublishPipeline;
use cadence_llm::CommentGenerator;
use std::sync::Arc;

pub use admission::admission_routes;
pub use comments::comments_routes;
pub use health::health_routes;
pub use plan::plan_routes;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PublishPipeline>,
    pub generator: Arc<dyn CommentGenerator>,
}

/// Create the API router with all endpoints
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(comments_routes())
        .merge(admission_routes())
        .merge(plan_routes())
        .layer(Extension(state))
}
