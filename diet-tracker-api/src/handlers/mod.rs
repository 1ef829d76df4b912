//! HTTP handlers for diet-tracker-api.

pub mod chat;
pub mod food;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Plain-text body for every unmatched method/path combination.
pub const DEFAULT_RESPONSE_BODY: &str = "Diet Tracker API";

pub async fn default_response() -> &'static str {
    DEFAULT_RESPONSE_BODY
}

/// Liveness probe. The service holds no connections, so it is always ok.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "diet-tracker-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
