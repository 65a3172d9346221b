/*
 * Responsibility
 * - GET /health (liveness)
 * - Goes through the authentication gate and simply stays anonymous
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
