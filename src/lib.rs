use anyhow::Result;

pub mod ai;
pub mod api;
pub mod config;
pub mod messages;
pub mod metrics;
pub mod ratelimit;
pub mod system_info;
pub mod tests;

pub use api::{router, ApiConfig, RateLimitConfig};
pub use config::Config;

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("{}", system_info::build_info());
    tracing::info!("Starting prompt optimization service...");

    let config = Config::from_env();

    let ai = match config.ai.clone() {
        Some(ai) => ai,
        None => {
            tracing::warn!("no provider API keys configured; optimization requests will fail");
            ai::AiConfig::unconfigured()
        }
    };

    let api_config = ApiConfig {
        rate_limit: Some(RateLimitConfig {
            max_requests: config.rate_limit_max_requests,
            window: std::time::Duration::from_secs(config.rate_limit_window_secs),
        }),
        max_input_chars: config.max_input_chars,
    };

    let app = router(ai, api_config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
