use dashmap::DashMap;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::metrics::RATE_LIMIT_CLIENTS;

/// Sliding-window limiter: a client may have at most `limit` admitted
/// requests in any trailing `window`.
pub struct SlidingWindowLimiter {
    // client id -> admitted request times, oldest first
    records: DashMap<String, VecDeque<Instant>>,
    limit: usize,
    window: Duration,
    stale_after: Duration,
}

/// Snapshot of one client's quota.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: usize,
    pub used: usize,
    pub remaining: usize,
    // window length in seconds
    pub window: u64,
    // seconds until the oldest counted request leaves the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_after: Option<u64>,
}

impl SlidingWindowLimiter {
    /// `stale_factor` windows after its last request a client is forgotten
    /// by [`evict_stale`](Self::evict_stale).
    pub fn new(limit: u32, window: Duration, stale_factor: u32) -> Self {
        Self {
            records: DashMap::new(),
            limit: limit as usize,
            window,
            stale_after: window * stale_factor.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit or reject a request from `id` at `now`, recording it when admitted.
    ///
    /// Prune, compare and append all happen under the entry's write guard, so
    /// two concurrent calls for the same client can't both slip past the limit.
    pub fn check_and_record(&self, id: &str, now: Instant) -> bool {
        let mut stamps = self.records.entry(id.to_string()).or_default();

        // expired entries are dropped even when the request is rejected
        while let Some(&oldest) = stamps.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                stamps.pop_front();
            } else {
                break;
            }
        }

        if stamps.len() >= self.limit {
            return false;
        }

        stamps.push_back(now);
        true
    }

    pub fn status(&self, id: &str) -> RateLimitStatus {
        self.status_at(id, Instant::now())
    }

    /// Quota for `id` as seen at `now`. Read-only: expired timestamps are
    /// skipped, not removed.
    pub fn status_at(&self, id: &str, now: Instant) -> RateLimitStatus {
        let (used, oldest) = match self.records.get(id) {
            Some(stamps) => {
                let mut live = stamps
                    .iter()
                    .filter(|&&t| now.saturating_duration_since(t) < self.window);
                let oldest = live.next().copied();
                (oldest.map_or(0, |_| 1 + live.count()), oldest)
            }
            None => (0, None),
        };

        let reset_after = oldest.map(|t| {
            let left = self.window.saturating_sub(now.saturating_duration_since(t));
            // round up so clients never retry a second too early
            left.as_secs() + u64::from(left.subsec_nanos() > 0)
        });

        RateLimitStatus {
            limit: self.limit,
            used,
            remaining: self.limit.saturating_sub(used),
            window: self.window.as_secs(),
            reset_after,
        }
    }

    /// Forget clients whose newest request is at least `stale_after` old.
    /// Returns how many were dropped.
    pub fn evict_stale(&self, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, stamps| match stamps.back() {
            Some(&newest) => now.saturating_duration_since(newest) < self.stale_after,
            None => false,
        });
        before.saturating_sub(self.records.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }
}

// Background sweeper - keeps the client map from growing without bound
pub async fn sweeper(limiter: Arc<SlidingWindowLimiter>, every: Duration) {
    let mut ticker = interval(every);
    tracing::info!(interval = ?every, "Rate limit sweeper started");

    loop {
        ticker.tick().await;
        let evicted = limiter.evict_stale(Instant::now());
        let tracked = limiter.tracked_clients();
        RATE_LIMIT_CLIENTS.set(tracked as f64);
        if evicted > 0 {
            tracing::debug!(evicted, tracked, "Evicted idle rate limit records");
        }
    }
}
