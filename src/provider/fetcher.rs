//! Fetch orchestrator.
//!
//! Per request: check the cache; on a miss make a single remote attempt
//! (no retry); parse by content type; cache the result. Any failure along
//! the way diverts to the mock provider, so callers always get a payload,
//! tagged with its source.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ProviderError;

use super::cache::{CacheKey, TtlCache};
use super::client::ProviderClient;
use super::parsers::{parse_fields, parse_meetings, parse_races, ParsePolicy};
use super::{build_url, cache_id, mock, Endpoint, FetchParams};

/// Where a payload came from. Serialized verbatim into the envelope so the
/// UI can show a provenance indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataSource {
    #[serde(rename = "Real API")]
    RealApi,
    #[serde(rename = "Mock API (Fallback)")]
    MockFallback,
}

/// A fetched payload with provenance.
#[derive(Debug)]
pub struct Fetched {
    pub data: Value,
    pub source: DataSource,
}

pub struct Fetcher {
    client: ProviderClient,
    cache: TtlCache,
    base_url: String,
}

impl Fetcher {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64, ttl_secs: i64) -> anyhow::Result<Self> {
        Ok(Self {
            client: ProviderClient::new(timeout_secs)?,
            cache: TtlCache::new(ttl_secs),
            base_url: base_url.into(),
        })
    }

    /// Fetch an endpoint, never failing hard: on any provider error the
    /// mock payload for the same endpoint and filters is returned instead.
    pub async fn fetch(&self, endpoint: Endpoint, params: &FetchParams, api_key: &str) -> Fetched {
        let key = CacheKey::new(endpoint, cache_id(endpoint, params));

        if let Some(data) = self.cache.get(&key).await {
            debug!(endpoint = endpoint.as_str(), id = %key.id, "cache hit");
            return Fetched {
                data,
                source: DataSource::RealApi,
            };
        }

        match self.fetch_remote(endpoint, params, api_key).await {
            Ok(data) => {
                self.cache.put(key, data.clone()).await;
                Fetched {
                    data,
                    source: DataSource::RealApi,
                }
            }
            Err(e) if e.is_auth() => {
                // A bad key is not an outage; make sure operators can see
                // the difference in the logs even though the route still
                // serves fallback data.
                warn!(endpoint = endpoint.as_str(), error = %e, "provider rejected API key, serving mock data");
                self.mock_payload(endpoint, params)
            }
            Err(e) => {
                warn!(endpoint = endpoint.as_str(), error = %e, "provider fetch failed, serving mock data");
                self.mock_payload(endpoint, params)
            }
        }
    }

    /// Single remote attempt: build URL, GET, select parser by content
    /// type. JSON bodies pass through as-is; text bodies go to the
    /// endpoint's caret parser.
    async fn fetch_remote(
        &self,
        endpoint: Endpoint,
        params: &FetchParams,
        api_key: &str,
    ) -> Result<Value, ProviderError> {
        let url = build_url(&self.base_url, endpoint, params, api_key);
        let raw = self.client.get(&url).await?;

        if raw.is_json() {
            return serde_json::from_str(&raw.body).map_err(|e| ProviderError::Parse(e.to_string()));
        }

        let parsed = match endpoint {
            Endpoint::Meetings => to_value(parse_meetings(&raw.body, ParsePolicy::Lenient)),
            Endpoint::Races => to_value(parse_races(&raw.body, ParsePolicy::Lenient)),
            Endpoint::Fields => to_value(parse_fields(&raw.body, ParsePolicy::Lenient)),
            // Comments only exist as JSON; a text body means the provider
            // sent something we don't understand.
            Endpoint::Comments => Err(ProviderError::Parse(format!(
                "unexpected content type {:?} for comments",
                raw.content_type
            ))),
        }?;

        Ok(parsed)
    }

    /// Probe the provider with a minimal meetings request, bypassing both
    /// cache and fallback so auth failures surface to the caller.
    pub async fn validate_key(&self, api_key: &str) -> Result<(), ProviderError> {
        let url = build_url(&self.base_url, Endpoint::Meetings, &FetchParams::default(), api_key);
        self.client.get(&url).await.map(|_| ())
    }

    fn mock_payload(&self, endpoint: Endpoint, params: &FetchParams) -> Fetched {
        let data = match endpoint {
            Endpoint::Meetings => serde_json::to_value(mock::meetings(params)),
            Endpoint::Races => serde_json::to_value(mock::races(params)),
            Endpoint::Fields => serde_json::to_value(mock::fields(params)),
            Endpoint::Comments => serde_json::to_value(mock::comments(params)),
        }
        .unwrap_or_else(|_| Value::Array(Vec::new()));

        Fetched {
            data,
            source: DataSource::MockFallback,
        }
    }
}

fn to_value<T: Serialize>(parsed: Result<Vec<T>, crate::error::CaretError>) -> Result<Value, ProviderError> {
    let records = parsed.map_err(|e| ProviderError::Parse(e.to_string()))?;
    serde_json::to_value(records).map_err(|e| ProviderError::Parse(e.to_string()))
}
