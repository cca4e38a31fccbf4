use axum::{response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

///GET /api/health
pub async fn health_route() -> impl IntoResponse {
    Json(json!({ "ok": true, "time": Utc::now().to_rfc3339() }))
}
