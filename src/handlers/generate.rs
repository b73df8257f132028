use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use crate::cache::{CacheEntry, lookup, make_cache_key};
use crate::error::AppError;
use crate::generator::build_prompt;
use crate::handlers::ClientId;
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, CACHE_SIZE, DEGRADED_PLAYLISTS, RATE_LIMITED_TOTAL,
    REQUEST_LATENCY, REQUEST_TOTAL, UPSTREAM_ERRORS,
};
use crate::models::{GenreRequest, PlaylistResponse};
use crate::parser::parse_playlist;
use crate::state::AppState;

// Trimmed genre, or the reason it's unusable
pub fn validate_genre(raw: &str, max_len: usize) -> Result<String, AppError> {
    let genre = raw.trim();
    if genre.is_empty() {
        return Err(AppError::InvalidGenre("Genre is required.".to_string()));
    }
    if genre.chars().count() > max_len {
        return Err(AppError::InvalidGenre(format!(
            "Genre must be at most {} characters.",
            max_len
        )));
    }
    Ok(genre.to_string())
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    ClientId(client): ClientId,
    Json(payload): Json<GenreRequest>,
) -> Result<Json<PlaylistResponse>, AppError> {
    REQUEST_TOTAL.inc();

    let genre = validate_genre(&payload.genre, state.max_genre_len).inspect_err(|e| {
        tracing::warn!(client = %client, error = %e, "Rejected genre");
    })?;

    let limiter = &state.rate_limiter;
    if !limiter.check_and_record(&client, Instant::now()) {
        RATE_LIMITED_TOTAL.inc();
        let status = limiter.status(&client);
        tracing::warn!(client = %client, limit = status.limit, "Rate limit exceeded");
        return Err(AppError::RateLimited {
            limit: status.limit,
            window: status.window,
            retry_after: status.reset_after,
        });
    }

    let start_time = Instant::now();
    tracing::info!(client = %client, genre = %genre, "Generating playlist");

    let prompt = build_prompt(&genre, state.playlist_size);
    let cache_key = make_cache_key(state.generator.model(), &prompt);

    let text = match lookup(&state.cache, &cache_key, state.ttl) {
        Some(text) => {
            CACHE_HITS.inc();
            tracing::debug!(genre = %genre, "Cache hit");
            text
        }
        None => {
            CACHE_MISSES.inc();
            let text = state.generator.generate(&prompt).await.inspect_err(|e| {
                UPSTREAM_ERRORS.inc();
                tracing::error!(genre = %genre, error = %e, "Generation failed");
            })?;
            if !state.ttl.is_zero() {
                state.cache.insert(cache_key, CacheEntry {
                    text: text.clone(),
                    created_at: Instant::now(),
                });
                CACHE_SIZE.set(state.cache.len() as f64);
            }
            text
        }
    };

    let playlist = parse_playlist(&text, &genre, state.playlist_size);
    let padded = playlist.iter().filter(|s| s.is_placeholder()).count();
    if padded > 0 {
        DEGRADED_PLAYLISTS.inc();
        tracing::warn!(genre = %genre, placeholders = padded, "Returning degraded playlist");
    }

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    tracing::info!(genre = %genre, "Generated playlist");

    Ok(Json(PlaylistResponse { genre, playlist }))
}
