//! Form-guide ingestion API library.
//!
//! Proxies a racing-data provider whose legacy endpoints return
//! caret-delimited text, normalizes responses into typed records, caches
//! them in-process, and falls back to mock data when the provider is
//! unreachable.

pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod routes;
pub mod types;
