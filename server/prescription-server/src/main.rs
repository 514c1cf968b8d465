use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

use prescription_server::{create_app, telemetry, PrescriptionServer, ServerConfig};

/// Prescription Desk HTTP Server
#[derive(Parser, Debug)]
#[command(name = "prescription-server")]
#[command(about = "Pharmacist accounts and OCR prescription records over HTTP")]
struct Args {
    /// Server bind address (overrides the config file)
    #[arg(long, env = "PRESCRIPTION_HOST")]
    host: Option<String>,

    /// Server port (overrides the config file)
    #[arg(short, long, env = "PRESCRIPTION_PORT")]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, default_value = "prescription-server.yaml")]
    config: String,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Keep records in memory even when a database is configured
    #[arg(long)]
    in_memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    telemetry::init_tracing(args.verbose)?;

    let mut config = ServerConfig::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.database_url.is_some() {
        config.database.url = args.database_url;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting prescription server");

    let server = PrescriptionServer::from_config(&config, args.in_memory).await?;
    let app = create_app(server);

    let bind = format!("{}:{}", config.server.host, config.server.port);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("Listening on http://{addr}");
    info!("Health check available at http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        return;
    }
    info!("Shutdown signal received");
}
