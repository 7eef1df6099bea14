//! litclock-gr (Grading) - rating service for literary clock snippets
//!
//! Serves random snippets to raters, records votes and exposes stats and
//! title review tools over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use litclock_common::config::{database_path, resolve_root_folder, GraderConfig, ROOT_FOLDER_ENV};
use litclock_common::db::init_database;
use litclock_gr::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for litclock-gr
#[derive(Parser, Debug)]
#[command(name = "litclock-gr")]
#[command(about = "Grading service for literary clock snippets")]
#[command(version)]
struct Args {
    /// Root folder holding litclock.db and litclock.toml
    #[arg(short, long, env = "LITCLOCK_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind (overrides litclock.toml)
    #[arg(long, env = "LITCLOCK_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides litclock.toml)
    #[arg(short, long, env = "LITCLOCK_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting litclock grading service (litclock-gr) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV);
    info!("Root folder: {}", root_folder.display());

    let mut config = GraderConfig::load(&root_folder).context("Failed to load litclock.toml")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    info!(
        "Selection policy: regrade probability {}, max attempts {}",
        config.selection.regrade_probability, config.selection.max_attempts
    );

    let db_path = database_path(&root_folder);
    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready: {}", db_path.display());
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    let addr: SocketAddr = listener.local_addr()?;

    let state = AppState::new(pool, config);
    let app = build_router(state);

    info!("litclock-gr listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
