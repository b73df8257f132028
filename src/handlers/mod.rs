mod client;
mod health;
mod metrics;
mod generate;
mod status;

pub use client::{ClientId, resolve_client_id};
pub use health::{health_handler, home_handler};
pub use metrics::metrics_handler;
pub use generate::{generate_handler, validate_genre};
pub use status::rate_limit_status_handler;
