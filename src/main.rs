//! pricewatch server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - PRICEWATCH_HOST: Bind address (default: 0.0.0.0)
//! - PRICEWATCH_PORT: Port number (default: 3000)
//! - PRICEWATCH_SWEEP_INTERVAL_SECS: Seconds between sweeps (default: 60)
//! - PRICEWATCH_HTTP_TIMEOUT_SECS: Upstream call timeout (default: 10)
//! - PRICEWATCH_PRICE_API_URL: Quote provider base URL (default: CoinGecko)
//! - PRICEWATCH_NOTIFY_WEBHOOK: Webhook URL for notifications
//!   (unset: notifications are written to the log)
//! - RUST_LOG: Log level (default: info)

use pricewatch::api::{run_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricewatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let defaults = ServerConfig::default();

    let host = std::env::var("PRICEWATCH_HOST").unwrap_or(defaults.host);
    let port: u16 = std::env::var("PRICEWATCH_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(defaults.port);
    let sweep_interval_secs: u64 = std::env::var("PRICEWATCH_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.sweep_interval_secs);
    let http_timeout_secs: u64 = std::env::var("PRICEWATCH_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.http_timeout_secs);
    let price_api_url =
        std::env::var("PRICEWATCH_PRICE_API_URL").unwrap_or(defaults.price_api_url);
    let notify_webhook = std::env::var("PRICEWATCH_NOTIFY_WEBHOOK").ok();

    let config = ServerConfig {
        host,
        port,
        sweep_interval_secs,
        http_timeout_secs,
        price_api_url,
        notify_webhook,
    };

    tracing::info!("pricewatch configuration:");
    tracing::info!("  Host: {}:{}", config.host, config.port);
    tracing::info!("  Sweep interval: {} seconds", config.sweep_interval_secs);
    tracing::info!("  Upstream timeout: {} seconds", config.http_timeout_secs);
    tracing::info!("  Price API: {}", config.price_api_url);
    match &config.notify_webhook {
        Some(url) => tracing::info!("  Notify webhook: {}", url),
        None => tracing::info!("  Notify webhook: NONE (log only)"),
    }

    run_server(config).await
}
