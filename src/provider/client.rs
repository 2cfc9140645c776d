//! HTTP client for the racing-data provider.
//!
//! One attempt per call, bounded by a 15-second timeout. A timed-out or
//! non-2xx response maps into the `ProviderError` taxonomy; the orchestrator
//! decides what to do with it.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;

use crate::error::ProviderError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Raw provider response: body plus the content type used for parser
/// selection.
#[derive(Debug)]
pub struct RawResponse {
    pub body: String,
    pub content_type: String,
}

impl RawResponse {
    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }
}

pub struct ProviderClient {
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { http })
    }

    /// GET a provider URL, mapping failures into the taxonomy.
    ///
    /// 401/403 become `Auth` so a bad key is distinguishable from an
    /// outage; other non-2xx statuses become `Status`.
    pub async fn get(&self, url: &str) -> Result<RawResponse, ProviderError> {
        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    url: redact_key(url),
                }
            } else {
                ProviderError::Network {
                    url: redact_key(url),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: redact_key(url),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/plain")
            .to_string();

        let body = response.text().await.map_err(|e| ProviderError::Network {
            url: redact_key(url),
            message: e.to_string(),
        })?;

        Ok(RawResponse { body, content_type })
    }
}

/// Strip the API key from a URL before it lands in logs or errors.
fn redact_key(url: &str) -> String {
    match url.find("apiKey=") {
        Some(start) => {
            let rest = &url[start..];
            let end = rest.find('&').map(|i| start + i).unwrap_or(url.len());
            format!("{}apiKey=***{}", &url[..start], &url[end..])
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_api_key_mid_query() {
        let url = "https://x.test/v2/racelist?apiKey=secret&meetingId=1";
        assert_eq!(redact_key(url), "https://x.test/v2/racelist?apiKey=***&meetingId=1");
    }

    #[test]
    fn redacts_api_key_at_end() {
        let url = "https://x.test/v2/meetingslist?apiKey=secret";
        assert_eq!(redact_key(url), "https://x.test/v2/meetingslist?apiKey=***");
    }

    #[test]
    fn json_detection_uses_content_type() {
        let json = RawResponse {
            body: "[]".to_string(),
            content_type: "application/json; charset=utf-8".to_string(),
        };
        let text = RawResponse {
            body: "a^b".to_string(),
            content_type: "text/plain".to_string(),
        };
        assert!(json.is_json());
        assert!(!text.is_json());
    }
}
