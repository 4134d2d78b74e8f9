//! subtrack-api - Main entry point
//!
//! Resolves configuration, opens the database and serves the subscription
//! API until Ctrl+C or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use subtrack_api::db::SqliteSubscriptionStore;
use subtrack_api::{build_router, AppState};
use subtrack_common::config::{ConfigOverrides, ServiceConfig};
use subtrack_common::db::{init_database, PoolSettings};
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for subtrack-api
#[derive(Parser, Debug)]
#[command(name = "subtrack-api")]
#[command(about = "Subscription tracking HTTP service")]
#[command(version)]
struct Args {
    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(short, long, env = "SUBTRACK_BIND")]
    bind: Option<String>,

    /// SQLite database path or sqlite: URL
    #[arg(short, long, env = "SUBTRACK_DATABASE")]
    database: Option<String>,

    /// TOML config file (default: ~/.config/subtrack/config.toml)
    #[arg(short, long, env = "SUBTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::resolve(ConfigOverrides {
        bind_addr: args.bind,
        database: args.database,
        config_file: args.config,
        log_level: args.log_level,
    })
    .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("subtrack_api={0},subtrack_common={0},tower_http={0}", config.log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting subtrack-api v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {}", config.database);

    let pool = init_database(
        &config.database,
        &PoolSettings {
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            max_lifetime: config.max_lifetime,
        },
    )
    .await
    .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let store = Arc::new(SqliteSubscriptionStore::new(pool.clone()));
    let app = build_router(AppState::from_store(store))
        .layer(TimeoutLayer::new(config.request_timeout));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("subtrack-api listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
            info!("Received terminate signal, shutting down");
        },
    }
}
