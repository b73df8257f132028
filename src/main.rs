use clap::Parser;
use playlist_gateway::build_router;
use playlist_gateway::cache;
use playlist_gateway::config::Args;
use playlist_gateway::generator::{CohereClient, CohereConfig};
use playlist_gateway::rate_limit::{SlidingWindowLimiter, sweeper};
use playlist_gateway::state::AppState;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playlist_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

// this is main async function with tokio
#[tokio::main]
async fn main() -> io::Result<()> {
    // .env is optional, real environment wins
    let _ = dotenvy::dotenv();
    init_tracing();

    // parse cli arguments
    let args = Args::parse();

    let generator = CohereClient::new(CohereConfig {
        api_url: args.api_url.clone(),
        api_key: args.api_key.clone(),
        model: args.model.clone(),
        max_tokens: args.max_tokens,
        timeout: Duration::from_secs(args.request_timeout),
    })
    .map_err(io::Error::other)?;

    let window = Duration::from_secs(args.rate_window);
    let rate_limiter = Arc::new(SlidingWindowLimiter::new(
        args.rate_limit,
        window,
        args.stale_factor,
    ));

    // creating shared state
    let state = Arc::new(AppState::new(
        Arc::new(generator),
        Arc::clone(&rate_limiter),
        Duration::from_secs(args.cache_ttl),
        args.playlist_size as usize,
        args.max_genre_len,
    )
    .with_trust_forwarded_for(args.trust_forwarded_for));

    let sweep_every = Duration::from_secs(args.sweep_interval);
    tokio::spawn(sweeper(rate_limiter, sweep_every));
    if args.cache_ttl > 0 {
        tokio::spawn(cache::sweeper(Arc::clone(&state), sweep_every));
    }

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        api_url = %args.api_url,
        model = %args.model,
        cache_ttl = args.cache_ttl,
        rate_limit = args.rate_limit,
        rate_window = args.rate_window,
        "Playlist gateway listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}
