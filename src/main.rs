//! Form-guide ingestion API
//!
//! REST API and CLI proxying a caret-delimited racing-data provider with
//! TTL caching and mock fallback.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use formguide_api::cli::{self, Cli, Commands};
use formguide_api::config::AppConfig;
use formguide_api::provider::Fetcher;
use formguide_api::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => run_server(Some(host), Some(port)).await,
        Commands::Fetch {
            endpoint,
            date,
            meeting_id,
            race_id,
            api_key,
        } => cli::run_fetch(endpoint, date, meeting_id, race_id, api_key).await,
        Commands::ValidateKey { api_key } => cli::run_validate_key(api_key).await,
    }
}

/// Run the API server.
async fn run_server(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formguide_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = AppConfig::load()?;

    // Override with CLI args
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("Provider base URL: {}", config.provider.base_url);

    let fetcher = Fetcher::new(
        config.provider.base_url.clone(),
        config.provider.timeout_secs,
        config.cache.ttl_secs,
    )?;

    // Create application state
    let state = Arc::new(AppState {
        fetcher,
        config: config.clone(),
    });

    // Build router
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
