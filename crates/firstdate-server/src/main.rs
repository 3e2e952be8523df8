use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use firstdate_server::config::Config;
use firstdate_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = Config::from_env().wrap_err("invalid configuration")?;
    let state = AppState::from_config(&config).wrap_err("failed to set up backend clients")?;
    tracing::info!(backend = ?config.backend, addr = %config.bind_addr, "starting firstdate-server");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind_addr))?;
    axum::serve(listener, firstdate_server::router(state))
        .await
        .wrap_err("server error")
}
