//! Configuration for the form-guide API.
//!
//! Layered the usual way: built-in defaults, then an optional `config`
//! file, then `FORMGUIDE_*` environment variables. The API key for a data
//! route resolves with one precedence order everywhere: request query
//! parameter, then integration settings file, then this config.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::provider::client::DEFAULT_TIMEOUT_SECS;
use crate::provider::{cache::DEFAULT_TTL_SECS, DEFAULT_BASE_URL};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key from config/environment; may be overridden per request.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: i64,
}

fn default_ttl_secs() -> i64 {
    DEFAULT_TTL_SECS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Directory holding per-integration settings JSON files.
    #[serde(default = "default_settings_dir")]
    pub settings_dir: String,
}

fn default_settings_dir() -> String {
    "data/settings".to_string()
}

impl AppConfig {
    /// Load configuration from defaults, config file, and environment.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("FORMGUIDE")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Per-integration settings persisted as one JSON file under
/// `data/settings/<name>.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSettings {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    #[serde(default)]
    pub is_valid: bool,
    pub last_validated: Option<String>,
    pub validation_error: Option<String>,
}

impl IntegrationSettings {
    fn path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}.json", name))
    }

    /// Load settings for an integration; `None` if no file exists.
    pub fn load(dir: &Path, name: &str) -> anyhow::Result<Option<Self>> {
        let path = Self::path(dir, name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        Ok(Some(settings))
    }

    /// Write settings, creating the directory if needed.
    pub fn save(&self, dir: &Path, name: &str) -> anyhow::Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating settings dir {}", dir.display()))?;
        let path = Self::path(dir, name);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)
            .with_context(|| format!("writing settings file {}", path.display()))?;
        Ok(())
    }

    /// Record a validation outcome.
    pub fn mark_validated(&mut self, error: Option<String>) {
        self.is_valid = error.is_none();
        self.last_validated = Some(Utc::now().to_rfc3339());
        self.validation_error = error;
    }
}

/// Resolve the API key for one request.
///
/// Precedence: request query parameter, then the integration settings
/// file, then config/environment. One order everywhere; individual routes
/// do not get to disagree.
pub fn resolve_api_key(
    query_key: Option<&str>,
    settings: Option<&IntegrationSettings>,
    config: &AppConfig,
) -> Option<String> {
    if let Some(key) = query_key.filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }
    if let Some(key) = settings.and_then(|s| s.api_key.as_deref()).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }
    config.provider.api_key.clone().filter(|k| !k.is_empty())
}
