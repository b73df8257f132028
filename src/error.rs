use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::generator::UpstreamError;

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidGenre(String),

    #[error("Rate limit exceeded: {limit} requests per {window} seconds")]
    RateLimited {
        limit: usize,
        window: u64,
        retry_after: Option<u64>,
    },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidGenre(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::RateLimited { limit, window, retry_after } => {
                let body = json!({
                    "error": format!(
                        "Rate limit exceeded: {} requests per {} seconds. Try again later.",
                        limit, window
                    ),
                    "limit": limit,
                    "window": window,
                    "retry_after": retry_after,
                });
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                if let Some(secs) = retry_after {
                    response
                        .headers_mut()
                        .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                }
                response
            }
            // upstream details stay in the logs
            AppError::Upstream(UpstreamError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                Json(json!({ "error": "Generation API timed out" })),
            )
                .into_response(),
            AppError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Error communicating with generation API" })),
            )
                .into_response(),
        }
    }
}
