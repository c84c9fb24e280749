//! Route table and handlers. Request bodies are parsed as JSON whatever their content type.

use std::sync::Arc;

use astro_oracle_core::{Answer, Oracle, OracleConfig, QuestionRequest, Reading, ReadingRequest};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OracleConfig>,
    pub oracle: Arc<Oracle>,
}

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/debug", get(debug))
        .route("/api/ping-gemini", get(ping_gemini))
        .route("/api/reading", post(reading))
        .route("/api/qa", post(qa))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(cors)
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn debug(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    Json(json!({
        "use_gemini": config.use_gemini,
        "env_key_present": config.key_present(),
        "env_key_masked": config.masked_key(),
        "gemini_model": config.gemini_model,
        "cwd": cwd,
        "env_loaded_from": config.env_loaded_from.display().to_string(),
    }))
}

/// Diagnostic round trip to the model. The only route that reports a 500.
async fn ping_gemini(State(state): State<AppState>) -> Response {
    let model = state.oracle.model().to_string();
    match state.oracle.ping().await {
        Ok(reply) => Json(json!({ "ok": true, "reply": reply, "model": model })).into_response(),
        Err(e) => {
            tracing::warn!(kind = e.kind(), "Gemini ping failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.to_string(), "model": model })),
            )
                .into_response()
        }
    }
}

async fn reading(State(state): State<AppState>, body: Bytes) -> Result<Json<Reading>, ApiError> {
    let req: ReadingRequest = parse_body(&body)?;
    let reading = state.oracle.reading(&req).await?;
    Ok(Json(reading))
}

async fn qa(State(state): State<AppState>, body: Bytes) -> Result<Json<Answer>, ApiError> {
    let req: QuestionRequest = parse_body(&body)?;
    let answer = state.oracle.answer(&req).await?;
    Ok(Json(answer))
}
