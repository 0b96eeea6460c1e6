//! navms server entrypoint

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use navms_server::routes::create_router;
use navms_server::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "navms_server=info,navms_resolver=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        bind_address = %config.bind_address,
        directory_endpoint = %config.directory_endpoint,
        directory_timeout_ms = config.directory_timeout.as_millis() as u64,
        "configuration loaded"
    );

    let state = AppState::from_config(&config)
        .with_context(|| format!("Failed to load redirect table from {}", config.redirects_path))?;

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for ctrl-c.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
    } else {
        tracing::info!("shutdown signal received");
    }
}
