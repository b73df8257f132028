use axum::{Json, extract::State};
use std::sync::Arc;
use crate::handlers::ClientId;
use crate::rate_limit::RateLimitStatus;
use crate::state::AppState;

// Caller's remaining quota; doesn't count as a request
pub async fn rate_limit_status_handler(
    State(state): State<Arc<AppState>>,
    ClientId(client): ClientId,
) -> Json<RateLimitStatus> {
    Json(state.rate_limiter.status(&client))
}
