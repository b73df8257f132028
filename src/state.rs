use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use crate::cache::CacheEntry;
use crate::generator::SongGenerator;
use crate::rate_limit::SlidingWindowLimiter;
// app's shared state

pub struct AppState {
    pub generator: Arc<dyn SongGenerator>,
    pub cache: DashMap<String, CacheEntry>, // cache key -> raw generated text
    pub ttl: Duration,                      // how long cache will be valid
    pub rate_limiter: Arc<SlidingWindowLimiter>,
    pub playlist_size: usize, // songs per response
    pub max_genre_len: usize,
    pub trust_forwarded_for: bool, // key clients by X-Forwarded-For
}

impl AppState {
    pub fn new(
        generator: Arc<dyn SongGenerator>,
        rate_limiter: Arc<SlidingWindowLimiter>,
        ttl: Duration,
        playlist_size: usize,
        max_genre_len: usize,
    ) -> Self {
        Self {
            generator,
            cache: DashMap::new(),
            ttl,
            rate_limiter,
            playlist_size,
            max_genre_len,
            trust_forwarded_for: false,
        }
    }

    // only for deployments behind a proxy that sets the header itself
    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}
