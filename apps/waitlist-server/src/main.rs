//! REST API server for the wait list.
//!
//! Loads the roster snapshot, starts the runtime loop on its own thread and
//! serves the API until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use waitlist_api::router::{AppState, Router};
use waitlist_api::server::Server;
use waitlist_core::config::RosterConfig;
use waitlist_core::{RosterError, RosterStore};
use waitlist_runtime::Runtime;

/// Command-line arguments for the wait list server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Data directory holding the roster snapshot
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Tick rate for runtime loop (Hz)
    #[arg(long, default_value_t = 20)]
    tickrate: u32,

    /// Countdown board refresh interval in milliseconds
    #[arg(long, default_value_t = 5000)]
    countdown_interval_ms: u64,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Response timeout in milliseconds
    #[arg(long, default_value_t = 10000)]
    response_timeout_ms: u64,

    /// UTC offset for displayed arrival times, in minutes
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_minutes: i32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RosterConfig {
        data_dir: args.data_dir.clone(),
        tickrate: args.tickrate,
        countdown_interval_ms: args.countdown_interval_ms,
        request_timeout_ms: args.request_timeout_ms,
        response_timeout_ms: args.response_timeout_ms,
        display_utc_offset_minutes: args.utc_offset_minutes,
        ..Default::default()
    };

    let store = match RosterStore::open(&config) {
        Ok(store) => Arc::new(store),
        Err(RosterError::CorruptPersistedState(msg)) => {
            tracing::error!("Roster snapshot corruption detected: {}", msg);
            tracing::error!(
                "Server cannot start. Restore or remove {}",
                config.snapshot_path().display()
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to load roster"),
    };
    tracing::info!("Loaded {} waiting guests", store.len());

    let (request_tx, request_rx) = mpsc::channel(1000);
    let mut runtime = Runtime::new(store.clone(), config.clone(), request_rx);
    let state = AppState::new(
        store.clone(),
        Arc::new(config.clone()),
        request_tx,
        runtime.board_receiver(),
        runtime.stats(),
    );

    let runtime_handle = thread::spawn(move || {
        if let Err(e) = runtime.run() {
            tracing::error!("Runtime loop fatal error: {}", e);
            std::process::exit(1);
        }
    });

    let router = Router::new(state).context("Failed to build router")?;
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid listen address")?;
    let server = Server::new(addr, router);

    tracing::info!(
        "Starting wait list server: data_dir={}, tickrate={} Hz, countdown every {} ms",
        config.data_dir.display(),
        config.tickrate,
        config.countdown_interval_ms
    );

    server
        .serve_until(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl_c: {}", e);
            }
            tracing::info!("Shutting down server...");
        })
        .await
        .context("Server error")?;

    // Server and router are gone, so the runtime drains its queue and exits
    tokio::task::spawn_blocking(move || runtime_handle.join())
        .await
        .context("Failed to wait for runtime loop")?
        .map_err(|_| anyhow::anyhow!("Runtime loop panicked"))?;

    store.persist().context("Final snapshot write failed")?;
    tracing::info!("Roster saved with {} guests", store.len());

    Ok(())
}
