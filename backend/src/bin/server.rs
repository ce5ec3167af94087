//! Timing mock HTTP server binary.
//!
//! Builds the fortune series, seeds the account store, and serves the
//! JSON API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin timing-server
//!
//! # Reproducible series on a different port
//! SERIES_SEED=42 PORT=8000 cargo run --bin timing-server
//! ```
//!
//! See [`timing_mock::config`] for every recognised variable. `RUST_LOG`
//! sets the log level (default: info).

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use timing_mock::config::ServerConfig;
use timing_mock::http::{create_router, AppState};
use timing_mock::services::accounts::spawn_code_sweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Timing mock server");

    let config = ServerConfig::from_env()?;
    info!(
        window_policy = %config.window_policy,
        code_ttl_secs = config.code_ttl_secs,
        seeded = config.series_seed.is_some(),
        "Configuration loaded"
    );

    let addr: SocketAddr = config.bind_address().parse()?;
    let sweep_secs = config.code_sweep_secs;
    let state = AppState::from_config(config);

    if sweep_secs > 0 {
        let _sweeper = spawn_code_sweeper(
            state.accounts.clone(),
            std::time::Duration::from_secs(sweep_secs),
        );
        info!(every_secs = sweep_secs, "Expired code sweeper started");
    }

    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Debug dump: http://{}/debug/codes", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
