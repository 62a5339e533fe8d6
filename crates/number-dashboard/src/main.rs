//! Number dashboard - Entry point.

use anyhow::Context;
use number_dashboard::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::{Config, LogConfig},
    SubaccountCache,
};
use secrecy::ExposeSecret;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use twilio_client::TwilioClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log);

    info!("Starting number dashboard");

    let twilio = TwilioClient::new(
        config.twilio.account_sid.clone(),
        config.twilio.auth_token.expose_secret().clone(),
        config.twilio.timeout,
    )
    .context("Failed to create Twilio client")?
    .with_base_urls(
        config.twilio.api_base_url.clone(),
        config.twilio.numbers_base_url.clone(),
    );

    if twilio.health_check().await {
        info!(account_sid = %config.twilio.account_sid, "Twilio credentials verified");
    } else {
        warn!("Twilio health check failed - will retry on requests");
    }

    let auth = config.dashboard_auth();
    if auth.is_empty() {
        anyhow::bail!("No dashboard users configured (set AUTH__USERS__<NAME>)");
    }
    info!(users = config.auth.users.len(), "Dashboard users loaded");

    let state = AppState::new(
        twilio,
        config.transfer_config(),
        SubaccountCache::new(config.cache.subaccounts_ttl),
        auth,
    );

    let rate_limit = RateLimitState::new(config.rate_limit.global_per_minute);
    let app = create_router_with_rate_limit(state, rate_limit);

    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .context("Invalid SERVER__LISTEN_ADDR")?,
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    info!("Shutting down...");
    Ok(())
}

fn init_logging(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let (text, json) = if log.json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}
