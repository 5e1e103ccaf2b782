use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use subfeed::config::Config;
use subfeed::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "subfeed", about = "Serve subreddit listings as RSS and Atom feeds")]
struct Args {
    /// TOML config file (optional; missing file means defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listening port, overriding the config file and PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::default(),
    }
    .apply_env();
    if let Some(port) = args.port {
        config.port = port;
    }

    let addr = format!("{}:{}", config.bind_address, config.port);
    let state = AppState::new(config).context("Failed to create application state")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server::serve(listener, state, shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Goodbye.");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
