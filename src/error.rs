//! Error taxonomy for provider ingestion.
//!
//! `ProviderError` covers everything that can go wrong talking to the
//! racing-data provider. Auth failures get their own variant so a
//! misconfigured key is distinguishable from a transient outage; data
//! routes still fall back to mock data either way, but the key-validation
//! path surfaces `Auth` as a 401.

use thiserror::Error;

/// Failures from the remote racing-data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("provider rejected API key (HTTP {status})")]
    Auth { status: u16 },

    #[error("provider returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    /// True for 401/403 responses from the provider.
    pub fn is_auth(&self) -> bool {
        matches!(self, ProviderError::Auth { .. })
    }
}

/// Strict CSV parse failures.
///
/// Unlike the caret parsers, the CSV path gates user-uploaded data, so
/// structural problems are surfaced to the caller instead of defaulted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    #[error("CSV input has no header line")]
    MissingHeader,

    #[error("CSV row {line} has {actual} fields, expected {expected}")]
    RowLength {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unterminated quoted field on row {line}")]
    UnterminatedQuote { line: usize },
}

/// Caret-parser failures, only produced under `ParsePolicy::Strict`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaretError {
    #[error("line {line}, field {column}: {value:?} is not numeric")]
    BadNumeric {
        line: usize,
        column: usize,
        value: String,
    },
}
