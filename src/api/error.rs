//! API error responses
//!
//! Every failed request answers with
//! `{"success": false, "error", "code", "retry_after_secs"?}`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_secs: Option<u64>,
}

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub category: Option<String>,
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            category: None,
            retry_after_secs: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
    }

    /// 429 for a spacing deferral; `wait_ms` is rounded up to whole seconds
    pub fn deferred(wait_ms: u64) -> Self {
        let mut err = Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "DEFERRED",
            format!("Too soon after the previous comment; retry in {wait_ms}ms"),
        );
        err.retry_after_secs = Some(wait_ms.div_ceil(1000));
        err
    }

    /// 429 once the daily cap is used up
    pub fn daily_limit(retry_after_secs: Option<u64>) -> Self {
        let mut err = Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "daily_limit_exceeded",
            "Daily comment limit reached",
        );
        err.retry_after_secs = retry_after_secs;
        err
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let retry_after = self.retry_after_secs;
        let body = ErrorBody {
            success: false,
            error: self.message,
            code: self.code,
            category: self.category,
            retry_after_secs: retry_after,
        };

        match retry_after {
            Some(secs) => (
                self.status,
                [(header::RETRY_AFTER, secs.to_string())],
                Json(body),
            )
                .into_response(),
            None => (self.status, Json(body)).into_response(),
        }
    }
}

impl From<cadence_core::Error> for ApiError {
    fn from(err: cadence_core::Error) -> Self {
        match err {
            cadence_core::Error::Execution(failure) => {
                let mut api = Self::new(
                    StatusCode::BAD_GATEWAY,
                    "EXECUTION_FAILED",
                    failure.to_string(),
                );
                api.category = Some(failure.category.to_string());
                api
            }
            cadence_core::Error::InvalidRequest(message) => Self::bad_request(message),
            other => {
                warn!(error = %other, "Internal error while publishing");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal server error",
                )
            }
        }
    }
}

impl From<cadence_llm::Error> for ApiError {
    fn from(err: cadence_llm::Error) -> Self {
        match err {
            cadence_llm::Error::InvalidInput(message) => Self::bad_request(message),
            other => Self::new(StatusCode::BAD_GATEWAY, "GENERATION_FAILED", other.to_string()),
        }
    }
}
