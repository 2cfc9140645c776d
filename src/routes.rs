//! API route handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;

use crate::config::{resolve_api_key, AppConfig, IntegrationSettings};
use crate::provider::{dates, Endpoint, FetchParams, Fetcher};
use crate::types::{Envelope, ErrorResponse, HealthResponse};

/// Integration name for the racing-data provider's settings file.
pub const PROVIDER_INTEGRATION: &str = "provider";

/// Application state shared across handlers.
pub struct AppState {
    pub fetcher: Fetcher,
    pub config: AppConfig,
}

impl AppState {
    fn settings_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.settings_dir)
    }

    /// Resolve the API key for a data request, or 401.
    fn require_api_key(&self, query_key: Option<&str>) -> Result<String, ApiError> {
        let settings = match IntegrationSettings::load(&self.settings_dir(), PROVIDER_INTEGRATION) {
            Ok(settings) => settings,
            Err(e) => {
                // An unreadable settings file must not take data routes
                // down; fall through to the remaining key sources.
                warn!(error = %e, "failed to read provider settings, falling back to config key");
                None
            }
        };
        resolve_api_key(query_key, settings.as_ref(), &self.config)
            .ok_or_else(|| ApiError::unauthorized("No API key configured"))
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/meetings", get(meetings))
        .route("/api/races", get(races))
        .route("/api/fields", get(fields))
        .route("/api/comments", get(comments))
        .route("/api/settings/:name", get(get_settings).put(put_settings))
        .route("/api/settings/:name/validate", post(validate_settings))
        .with_state(state)
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
            details: None,
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
            details: None,
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
            details: None,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct MeetingsQuery {
    /// ISO date; unparseable input falls back to today, matching the
    /// provider date formatter's documented lenient policy.
    pub date: Option<String>,
    pub track: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Meetings for a date.
pub async fn meetings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MeetingsQuery>,
) -> Result<Json<Envelope>, ApiError> {
    let api_key = state.require_api_key(query.api_key.as_deref())?;

    let params = FetchParams {
        date: query.date.as_deref().and_then(dates::parse_iso).or_else(|| Some(dates::today())),
        track: query.track,
        ..Default::default()
    };

    let fetched = state.fetcher.fetch(Endpoint::Meetings, &params, &api_key).await;
    Ok(Json(Envelope::new(fetched.data, fetched.source)))
}

#[derive(Debug, Deserialize)]
pub struct RacesQuery {
    #[serde(rename = "meetingId")]
    pub meeting_id: Option<i64>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Races for a meeting.
pub async fn races(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RacesQuery>,
) -> Result<Json<Envelope>, ApiError> {
    let meeting_id = query
        .meeting_id
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: meetingId"))?;
    let api_key = state.require_api_key(query.api_key.as_deref())?;

    let params = FetchParams {
        meeting_id: Some(meeting_id),
        ..Default::default()
    };

    let fetched = state.fetcher.fetch(Endpoint::Races, &params, &api_key).await;
    Ok(Json(Envelope::new(fetched.data, fetched.source)))
}

#[derive(Debug, Deserialize)]
pub struct RaceQuery {
    #[serde(rename = "raceId")]
    pub race_id: Option<i64>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Field (runners) for a race.
pub async fn fields(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RaceQuery>,
) -> Result<Json<Envelope>, ApiError> {
    let race_id = query
        .race_id
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: raceId"))?;
    let api_key = state.require_api_key(query.api_key.as_deref())?;

    let params = FetchParams {
        race_id: Some(race_id),
        ..Default::default()
    };

    let fetched = state.fetcher.fetch(Endpoint::Fields, &params, &api_key).await;
    Ok(Json(Envelope::new(fetched.data, fetched.source)))
}

/// Per-runner comments for a race.
pub async fn comments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RaceQuery>,
) -> Result<Json<Envelope>, ApiError> {
    let race_id = query
        .race_id
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: raceId"))?;
    let api_key = state.require_api_key(query.api_key.as_deref())?;

    let params = FetchParams {
        race_id: Some(race_id),
        ..Default::default()
    };

    let fetched = state.fetcher.fetch(Endpoint::Comments, &params, &api_key).await;
    Ok(Json(Envelope::new(fetched.data, fetched.source)))
}

/// Read an integration's settings file.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<IntegrationSettings>, ApiError> {
    let settings = IntegrationSettings::load(&state.settings_dir(), &name)
        .map_err(|e| ApiError::internal("Failed to read settings").with_details(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("No settings for integration '{}'", name)))?;
    Ok(Json(settings))
}

/// Write an integration's settings file.
pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(settings): Json<IntegrationSettings>,
) -> Result<Json<IntegrationSettings>, ApiError> {
    settings
        .save(&state.settings_dir(), &name)
        .map_err(|e| ApiError::internal("Failed to write settings").with_details(e.to_string()))?;
    Ok(Json(settings))
}

/// Probe the provider with the integration's key and record the outcome.
///
/// Unlike the data routes, auth failures surface here as a 401 so a
/// misconfigured key is visible to operators instead of being masked by
/// the mock fallback.
pub async fn validate_settings(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<IntegrationSettings>, ApiError> {
    let dir = state.settings_dir();
    let mut settings = IntegrationSettings::load(&dir, &name)
        .map_err(|e| ApiError::internal("Failed to read settings").with_details(e.to_string()))?
        .ok_or_else(|| ApiError::not_found(format!("No settings for integration '{}'", name)))?;

    let api_key = resolve_api_key(None, Some(&settings), &state.config)
        .ok_or_else(|| ApiError::unauthorized("No API key configured"))?;

    let outcome = state.fetcher.validate_key(&api_key).await;
    settings.mark_validated(outcome.as_ref().err().map(|e| e.to_string()));
    settings
        .save(&dir, &name)
        .map_err(|e| ApiError::internal("Failed to write settings").with_details(e.to_string()))?;

    match outcome {
        Ok(()) => Ok(Json(settings)),
        Err(e) if e.is_auth() => {
            Err(ApiError::unauthorized("Provider rejected the API key").with_details(e.to_string()))
        }
        Err(e) => Err(ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "Provider unreachable".to_string(),
            details: Some(e.to_string()),
        }),
    }
}
