//! Domain records and HTTP envelope types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::fetcher::DataSource;

/// A race day at one track.
///
/// Parsed from one caret-delimited line; `races` is attached post-hoc by
/// key-matching on `meeting_id` after a separate fetch.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub meeting_id: i64,
    pub track: String,
    pub rail_position: String,
    #[serde(rename = "isTABMeeting")]
    pub is_tab_meeting: bool,
    pub meeting_date: String,
    pub is_barrier_trial: bool,
    pub has_sectionals: bool,
    pub track_abbrev: String,
    pub resulted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub races: Vec<Race>,
}

/// A single scheduled race within a meeting.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub race_id: i64,
    pub meeting_id: i64,
    pub race_name: String,
    pub race_no: u32,
    pub prize_money: i64,
    pub starters: u32,
    pub start_time: String,
    pub class: String,
    pub distance: u32,
    pub age_restrictions: String,
    pub sex_restrictions: String,
    pub weight_type: String,
}

/// One horse's entry (and, post-race, its result) within a race.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field_id: i64,
    pub race_id: i64,
    pub tab_no: u32,
    pub position: u32,
    pub margin: f64,
    pub horse: String,
    pub trainer: String,
    pub jockey: String,
    pub weight: f64,
    pub barrier: u32,
    pub in_run: String,
    pub flucs: String,
    #[serde(rename = "priceSP")]
    pub price_sp: f64,
    #[serde(rename = "priceTAB")]
    pub price_tab: f64,
}

/// Per-runner form comment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub race_id: i64,
    pub tab_no: u32,
    pub horse: String,
    pub comment: String,
}

/// Success envelope returned by every data route.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub data: Value,
    pub source: DataSource,
    pub timestamp: String,
}

impl Envelope {
    pub fn new(data: Value, source: DataSource) -> Self {
        Self {
            success: true,
            data,
            source,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
