//! Soundwork marketplace console - desktop entry point.
// Dioxus rsx! macro generates deeply nested types requiring higher recursion limit
#![recursion_limit = "512"]

mod app;

use market::{MarketConfig, MarketResult};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::{SharedAppState, SHARED_STATE};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> MarketResult<()> {
    init_logging();
    info!("Starting Soundwork marketplace console");

    let config = MarketConfig::from_env()?;
    info!(
        "Cluster {} via {} (asset {})",
        config.cluster, config.rpc_url, config.asset_mint
    );

    let app_state = SharedAppState::from_config(config)?;

    // Reconnect the last wallet if its keypair is where we expect it.
    if app_state.config.keypair_path.exists() {
        if let Err(e) = app_state.connect_keypair_file() {
            warn!("Wallet auto-connect failed: {}", e);
        }
    } else {
        info!(
            "No keypair at {}, starting disconnected",
            app_state.config.keypair_path.display()
        );
    }

    SHARED_STATE.set(app_state).ok();

    // Launch Dioxus UI (blocks until window is closed)
    dioxus::launch(app::app);

    info!("UI closed, shutting down...");
    Ok(())
}
