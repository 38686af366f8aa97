//! spf-api - Speaker prospect filtering HTTP service
//!
//! Serves the upload, filter and export endpoints used by the browser
//! front end.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spf_api::{build_router, AppState};
use spf_common::config::TomlConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Command-line arguments for spf-api
#[derive(Parser, Debug)]
#[command(name = "spf-api")]
#[command(about = "Speaker prospect filtering service")]
#[command(version)]
struct Args {
    /// Port to listen on [default: 8000]
    #[arg(short, long, env = "SPF_API_PORT")]
    port: Option<u16>,

    /// Address to bind [default: 127.0.0.1]
    #[arg(long, env = "SPF_API_HOST")]
    host: Option<String>,

    /// Config file (overrides SPF_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spf_api=info,spf_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting spf-api v{}", env!("CARGO_PKG_VERSION"));

    let toml_config =
        TomlConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    let classifier_config = toml_config.classifier_config();
    classifier_config
        .validate()
        .context("Invalid classifier configuration")?;

    let port = resolve_server_setting("port", args.port, toml_config.server.port, DEFAULT_PORT);
    let host = resolve_server_setting(
        "host",
        args.host,
        toml_config.server.host,
        DEFAULT_HOST.to_string(),
    );

    info!(
        "Columns: tags='{}', rating='{}', engagement='{}'",
        classifier_config.columns.tags,
        classifier_config.columns.rating,
        classifier_config.columns.engagement_rating
    );

    let app = build_router(AppState::new(classifier_config));

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("spf-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// CLI/ENV → TOML → default
fn resolve_server_setting<T>(name: &str, cli: Option<T>, toml: Option<T>, default: T) -> T {
    match (cli, toml) {
        (Some(cli), Some(_)) => {
            warn!(
                "Server {} set on command line or environment and in TOML config. Using command line/environment.",
                name
            );
            cli
        }
        (Some(cli), None) => cli,
        (None, Some(toml)) => toml,
        (None, None) => default,
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
                warn!("Failed to install terminate handler: {}", e);
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
