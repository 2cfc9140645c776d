//! Parsers for the provider's caret-delimited text responses.
//!
//! One record per line, fields separated by `^`. Lines with fewer than a
//! per-parser minimum field count are dropped as truncated. Under the
//! default `Lenient` policy an unparseable numeric field becomes `0` and
//! parsing never fails; `Strict` reports the offending line and column
//! instead.

pub mod fields;
pub mod meetings;
pub mod races;

pub use fields::parse_fields;
pub use meetings::parse_meetings;
pub use races::parse_races;

use crate::error::CaretError;

/// How numeric parse failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Unparseable numerics default to 0; favors availability.
    #[default]
    Lenient,
    /// Unparseable numerics are an error naming line and column.
    Strict,
}

/// Split a body into trimmed, non-empty lines.
pub(crate) fn record_lines(body: &str) -> impl Iterator<Item = (usize, &str)> {
    body.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

pub(crate) fn int_field(
    policy: ParsePolicy,
    raw: &str,
    line: usize,
    column: usize,
) -> Result<i64, CaretError> {
    match raw.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) => match policy {
            ParsePolicy::Lenient => Ok(0),
            ParsePolicy::Strict => Err(CaretError::BadNumeric {
                line,
                column,
                value: raw.to_string(),
            }),
        },
    }
}

pub(crate) fn uint_field(
    policy: ParsePolicy,
    raw: &str,
    line: usize,
    column: usize,
) -> Result<u32, CaretError> {
    match raw.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) => match policy {
            ParsePolicy::Lenient => Ok(0),
            ParsePolicy::Strict => Err(CaretError::BadNumeric {
                line,
                column,
                value: raw.to_string(),
            }),
        },
    }
}

pub(crate) fn float_field(
    policy: ParsePolicy,
    raw: &str,
    line: usize,
    column: usize,
) -> Result<f64, CaretError> {
    match raw.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) => match policy {
            ParsePolicy::Lenient => Ok(0.0),
            ParsePolicy::Strict => Err(CaretError::BadNumeric {
                line,
                column,
                value: raw.to_string(),
            }),
        },
    }
}

/// Booleans are an exact, case-sensitive match against `"True"`.
pub(crate) fn bool_field(raw: &str) -> bool {
    raw == "True"
}
