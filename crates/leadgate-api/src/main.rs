//! Leadgate REST API entry point.
//!
//! Binary name: `leadgate`
//!
//! Parses CLI arguments, initializes the database and services, spawns the
//! session eviction sweep, then serves the API until shutdown.

mod http;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use state::AppState;

#[derive(Parser)]
#[command(name = "leadgate", version, about = "Lead-generation backend")]
struct Cli {
    /// Bind address, overriding config.toml (e.g. 0.0.0.0:8080).
    #[arg(long)]
    bind: Option<String>,

    /// Data directory holding config.toml and the SQLite database.
    /// Defaults to $LEADGATE_DATA_DIR or ~/.leadgate.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long)]
    otel: bool,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "info",
        1 => "info,leadgate=debug",
        _ => "trace",
    };
    leadgate_observe::tracing_setup::init_tracing(default_filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let state = AppState::init(cli.data_dir).await?;

    let bind_addr = cli
        .bind
        .unwrap_or_else(|| state.config.server.bind_addr.clone());

    // Background sweep dropping sessions idle past the TTL.
    let sessions = Arc::clone(&state.sessions);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle(chrono::Utc::now());
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle chat sessions");
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Leadgate API listening");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    leadgate_observe::tracing_setup::shutdown_tracing();
    tracing::info!("Server stopped");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
