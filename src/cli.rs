//! CLI commands for formguide-api.
//!
//! Supports API server mode, one-shot fetches through the orchestrator,
//! and API-key validation.

use clap::{Parser, Subcommand};

use crate::config::{resolve_api_key, AppConfig, IntegrationSettings};
use crate::provider::{dates, Endpoint, FetchParams, Fetcher};
use crate::routes::PROVIDER_INTEGRATION;

#[derive(Parser)]
#[command(name = "formguide-api")]
#[command(version, about = "Racing form-guide ingestion API and CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Fetch one endpoint and print the JSON payload
    Fetch {
        /// Endpoint name (meetings, races, fields, comments)
        #[arg(value_name = "ENDPOINT")]
        endpoint: String,

        /// Meeting date (ISO, meetings only)
        #[arg(short, long)]
        date: Option<String>,

        /// Meeting id (races only)
        #[arg(short, long)]
        meeting_id: Option<i64>,

        /// Race id (fields/comments only)
        #[arg(short, long)]
        race_id: Option<i64>,

        /// API key override
        #[arg(short, long)]
        api_key: Option<String>,
    },

    /// Probe the provider and record whether the configured key works
    ValidateKey {
        /// API key override
        #[arg(short, long)]
        api_key: Option<String>,
    },
}

fn build_fetcher(config: &AppConfig) -> anyhow::Result<Fetcher> {
    Fetcher::new(
        config.provider.base_url.clone(),
        config.provider.timeout_secs,
        config.cache.ttl_secs,
    )
}

fn load_key(config: &AppConfig, override_key: Option<String>) -> anyhow::Result<String> {
    let settings = IntegrationSettings::load(
        std::path::Path::new(&config.settings_dir),
        PROVIDER_INTEGRATION,
    )?;
    resolve_api_key(override_key.as_deref(), settings.as_ref(), config)
        .ok_or_else(|| anyhow::anyhow!("no API key configured (flag, settings file, or config/environment)"))
}

/// Run a one-shot fetch and print the envelope payload as JSON.
pub async fn run_fetch(
    endpoint: String,
    date: Option<String>,
    meeting_id: Option<i64>,
    race_id: Option<i64>,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let endpoint = Endpoint::from_name(&endpoint)
        .ok_or_else(|| anyhow::anyhow!("unknown endpoint '{}'", endpoint))?;

    let config = AppConfig::load()?;
    let fetcher = build_fetcher(&config)?;
    let key = load_key(&config, api_key)?;

    let params = FetchParams {
        date: date.as_deref().and_then(dates::parse_iso),
        meeting_id,
        race_id,
        ..Default::default()
    };

    let fetched = fetcher.fetch(endpoint, &params, &key).await;
    eprintln!("source: {}", serde_json::to_value(fetched.source)?);
    println!("{}", serde_json::to_string_pretty(&fetched.data)?);
    Ok(())
}

/// Probe the provider and persist the validation result.
pub async fn run_validate_key(api_key: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let fetcher = build_fetcher(&config)?;
    let key = load_key(&config, api_key)?;

    let outcome = fetcher.validate_key(&key).await;

    let dir = std::path::Path::new(&config.settings_dir);
    let mut settings = IntegrationSettings::load(dir, PROVIDER_INTEGRATION)?
        .unwrap_or_default();
    settings.api_key = Some(key);
    settings.endpoint = Some(config.provider.base_url.clone());
    settings.mark_validated(outcome.as_ref().err().map(|e| e.to_string()));
    settings.save(dir, PROVIDER_INTEGRATION)?;

    match outcome {
        Ok(()) => {
            println!("API key accepted by provider");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("validation failed: {}", e)),
    }
}
