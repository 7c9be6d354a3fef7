mod app;
mod config;
mod handlers;
mod service;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_core::auth::hash_password;
use catalog_core::storage::ItemStore;
use clap::{Parser, Subcommand, ValueEnum};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::Config,
    state::AppState,
    storage::{DynamoDbStore, InMemoryStore},
};

/// Catalog - HTTP backend for a virtual product catalog
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "8080", env = "PORT")]
    port: u16,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = StoreKind::Dynamodb, env = "CATALOG_STORE")]
    store: StoreKind,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// AWS DynamoDB (or a local endpoint set with AWS_ENDPOINT_URL)
    Dynamodb,
    /// Process-local tables, empty on every start
    Memory,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an Argon2 hash of a password, for provisioning users
    HashPassword {
        /// Plaintext password to hash
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside local development.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = &cli.command {
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    init_tracing();

    let config = Config::from_env().context("invalid configuration")?;

    let store: Arc<dyn ItemStore> = match cli.store {
        StoreKind::Dynamodb => {
            tracing::info!(
                region = %config.aws_region,
                endpoint = config.aws_endpoint_url.as_deref().unwrap_or("default"),
                "Using DynamoDB store"
            );
            Arc::new(
                DynamoDbStore::connect(&config.aws_region, config.aws_endpoint_url.as_deref())
                    .await,
            )
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let state = AppState::new(store, config);
    state
        .service
        .check_tables()
        .await
        .context("product or user table is not reachable")?;

    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Installs the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
