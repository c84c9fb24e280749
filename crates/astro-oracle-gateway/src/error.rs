//! HTTP error shaping: caller-facing failures rendered as `{error: ...}` JSON.

use astro_oracle_core::OracleError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Oracle(OracleError),
    InvalidJson(String),
}

impl From<OracleError> for ApiError {
    fn from(e: OracleError) -> Self {
        ApiError::Oracle(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Oracle(OracleError::LimitReached) => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": OracleError::LimitReached.to_string(),
                    "limit_reached": true,
                })),
            )
                .into_response(),
            ApiError::Oracle(e) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::InvalidJson(detail) => {
                tracing::debug!("Rejected request body: {}", detail);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid JSON body" })),
                )
                    .into_response()
            }
        }
    }
}
