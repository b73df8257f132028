use clap::Parser;

// CLI argument structure, every flag can also come from the environment / .env
#[derive(Parser, Debug, Clone)]
#[command(name = "playlist-gateway")]
#[command(about = "Genre to playlist service backed by the Cohere generate API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    // Cohere API key (never logged)
    #[arg(long, env = "COHERE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    // Base url of the generation API
    #[arg(long, env = "COHERE_API_URL", default_value = "https://api.cohere.ai")]
    pub api_url: String,

    // Generation model name
    #[arg(short, long, env = "COHERE_MODEL", default_value = "command")]
    pub model: String,

    #[arg(long, env = "COHERE_MAX_TOKENS", default_value_t = 100)]
    pub max_tokens: u32,

    // Timeout for the outbound generation call, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    // Cache TTL in seconds (0 disables the cache)
    #[arg(short, long, env = "CACHE_TTL", default_value_t = 30)]
    pub cache_ttl: u64,

    // Rate limit max requests per window
    #[arg(long, env = "RATE_LIMIT", default_value_t = 10,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_WINDOW", default_value_t = 3600,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub rate_window: u64,

    // How often idle rate limit records are swept, in seconds
    #[arg(long, env = "SWEEP_INTERVAL", default_value_t = 300,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval: u64,

    // A client is dropped once its newest request is this many windows old
    #[arg(long, env = "STALE_FACTOR", default_value_t = 2,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub stale_factor: u32,

    // Key rate limits by X-Forwarded-For; only enable behind a trusted proxy
    #[arg(long, env = "TRUST_FORWARDED_FOR", default_value_t = false)]
    pub trust_forwarded_for: bool,

    // Songs returned per playlist
    #[arg(long, env = "PLAYLIST_SIZE", default_value_t = 5,
          value_parser = clap::value_parser!(u64).range(1..=50))]
    pub playlist_size: u64,

    // Longest genre accepted, in characters
    #[arg(long, env = "MAX_GENRE_LEN", default_value_t = 100)]
    pub max_genre_len: usize,
}
