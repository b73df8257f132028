use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn home_handler() -> impl IntoResponse {
    Json(json!({ "message": "Music Playlist Generator API is running!" }))
}

// health handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
