use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::metrics::CACHE_SIZE;
use crate::state::AppState;

// Cache entry with timestamp - holds the raw generated text, not the parsed
// playlist, so every hit still gets its own random selection
#[derive(Clone)]
pub struct CacheEntry {
    pub text: String,
    pub created_at: Instant,
}

// Create a cache key (hash of model + prompt)
pub fn make_cache_key(model: &str, prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model);
    hasher.update(prompt);
    format!("{:x}", hasher.finalize())
}

// Fresh cached text for `key`; an expired entry is removed on the way out
pub fn lookup(cache: &DashMap<String, CacheEntry>, key: &str, ttl: Duration) -> Option<String> {
    if ttl.is_zero() {
        return None;
    }
    let fresh = cache
        .get(key)
        .map(|entry| (entry.created_at.elapsed() < ttl).then(|| entry.text.clone()))?;
    if fresh.is_none() {
        // a concurrent miss may already have stored a fresh entry under this key
        if cache.remove_if(key, |_, e| e.created_at.elapsed() >= ttl).is_some() {
            CACHE_SIZE.set(cache.len() as f64);
        }
    }
    fresh
}

// Drop every entry older than `ttl`, returns how many went
pub fn evict_expired(cache: &DashMap<String, CacheEntry>, ttl: Duration) -> usize {
    let before = cache.len();
    cache.retain(|_, e| e.created_at.elapsed() < ttl);
    CACHE_SIZE.set(cache.len() as f64);
    before.saturating_sub(cache.len())
}

// Background sweeper - entries for genres nobody asks for again would
// otherwise stay forever
pub async fn sweeper(state: Arc<AppState>, every: Duration) {
    let mut ticker = interval(every);
    tracing::info!(interval = ?every, "Cache sweeper started");

    loop {
        ticker.tick().await;
        let evicted = evict_expired(&state.cache, state.ttl);
        if evicted > 0 {
            tracing::debug!(evicted, remaining = state.cache.len(), "Evicted expired cache entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_depends_on_model_and_prompt() {
        let a = make_cache_key("command", "Suggest 5 jazz songs");
        assert_eq!(a, make_cache_key("command", "Suggest 5 jazz songs"));
        assert_ne!(a, make_cache_key("command-light", "Suggest 5 jazz songs"));
        assert_ne!(a, make_cache_key("command", "Suggest 5 rock songs"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn lookup_honours_ttl() {
        let cache = DashMap::new();
        cache.insert(
            "fresh".to_string(),
            CacheEntry { text: "A - B".to_string(), created_at: Instant::now() },
        );
        assert_eq!(lookup(&cache, "fresh", Duration::from_secs(30)).as_deref(), Some("A - B"));
        assert_eq!(lookup(&cache, "fresh", Duration::ZERO), None);
        assert_eq!(lookup(&cache, "missing", Duration::from_secs(30)), None);
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = DashMap::new();
        let created_at = Instant::now()
            .checked_sub(Duration::from_secs(60))
            .unwrap_or_else(Instant::now);
        cache.insert("old".to_string(), CacheEntry { text: "A - B".to_string(), created_at });

        assert_eq!(lookup(&cache, "old", Duration::from_secs(30)), None);
        assert!(!cache.contains_key("old"));
    }

    fn aged(secs: u64) -> CacheEntry {
        let created_at = Instant::now()
            .checked_sub(Duration::from_secs(secs))
            .unwrap_or_else(Instant::now);
        CacheEntry { text: "A - B".to_string(), created_at }
    }

    #[test]
    fn evict_expired_drops_keys_nobody_looked_up() {
        let cache = DashMap::new();
        for i in 0..200 {
            cache.insert(format!("genre-{}", i), aged(120));
        }
        for i in 0..10 {
            cache.insert(format!("new-{}", i), aged(0));
        }

        assert_eq!(evict_expired(&cache, Duration::from_secs(60)), 200);
        assert_eq!(cache.len(), 10);
        assert!(cache.iter().all(|e| e.key().starts_with("new-")));
    }

    #[test]
    fn refreshed_key_is_served_and_kept() {
        let cache = DashMap::new();
        cache.insert("k".to_string(), aged(120));
        cache.insert("other".to_string(), aged(120));
        // another request stored a new reply under the same key
        cache.insert("k".to_string(), aged(0));

        assert_eq!(lookup(&cache, "k", Duration::from_secs(60)).as_deref(), Some("A - B"));
        assert!(cache.contains_key("k"));

        assert_eq!(lookup(&cache, "other", Duration::from_secs(60)), None);
        assert!(!cache.contains_key("other"));
        assert_eq!(cache.len(), 1);
    }
}
