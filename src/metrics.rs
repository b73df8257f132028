use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("playlist_requests_total", "Total number of playlist requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("playlist_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("playlist_cache_misses_total", "Total cache misses").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "playlist_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("playlist_cache_size", "Current number of items in cache").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("playlist_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref RATE_LIMIT_CLIENTS: Gauge =
        register_gauge!("playlist_rate_limit_clients", "Client ids tracked by the rate limiter").unwrap();
    pub static ref UPSTREAM_ERRORS: Counter =
        register_counter!("playlist_upstream_errors_total", "Failed calls to the generation API").unwrap();
    pub static ref DEGRADED_PLAYLISTS: Counter =
        register_counter!("playlist_degraded_total", "Playlists padded with placeholder songs").unwrap();
}
