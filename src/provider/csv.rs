//! Strict CSV parsing and serialization.
//!
//! Used for the provider's comma-separated endpoints and for validating
//! uploaded result files. Unlike the caret parsers, structural problems
//! here are errors: this path gates user-supplied data.

use std::collections::HashMap;

use crate::error::CsvError;

/// A parsed CSV document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

/// Parse CSV text. The first record is the header row; every following
/// non-empty record is zipped against the headers positionally. A newline
/// inside a quoted field belongs to the field, not a record boundary.
pub fn parse_csv(text: &str) -> Result<CsvTable, CsvError> {
    let mut records = split_records(text)?.into_iter();

    let (header_no, header_line) = records.next().ok_or(CsvError::MissingHeader)?;
    let headers = split_line(&header_line, header_no)?;
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::MissingHeader);
    }

    let mut rows = Vec::new();
    for (line_no, record) in records {
        let values = split_line(&record, line_no)?;
        if values.len() != headers.len() {
            return Err(CsvError::RowLength {
                line: line_no,
                expected: headers.len(),
                actual: values.len(),
            });
        }
        rows.push(headers.iter().cloned().zip(values).collect());
    }

    Ok(CsvTable { headers, rows })
}

/// Split input into records, each tagged with its starting line number.
/// Newlines only terminate a record outside quotes, so a quoted field may
/// span lines; blank records are skipped.
fn split_records(text: &str) -> Result<Vec<(usize, String)>, CsvError> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line_no = 1;
    let mut start_line = 1;

    for c in text.chars() {
        match c {
            // Doubled quotes toggle twice, leaving the state unchanged.
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '\n' if !in_quotes => {
                if current.ends_with('\r') {
                    current.pop();
                }
                if !current.trim().is_empty() {
                    records.push((start_line, std::mem::take(&mut current)));
                } else {
                    current.clear();
                }
                line_no += 1;
                start_line = line_no;
            }
            '\n' => {
                current.push(c);
                line_no += 1;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line: start_line });
    }
    if !current.trim().is_empty() {
        records.push((start_line, current));
    }

    Ok(records)
}

/// Serialize rows under the given header order, quoting any value that
/// contains a delimiter, quote, or newline and doubling embedded quotes.
pub fn to_csv(rows: &[HashMap<String, String>], headers: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&join_line(headers.iter().map(String::as_str)));
    out.push('\n');

    for row in rows {
        let line = join_line(
            headers
                .iter()
                .map(|h| row.get(h).map(String::as_str).unwrap_or("")),
        );
        out.push_str(&line);
        out.push('\n');
    }

    out
}

fn join_line<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.map(escape).collect::<Vec<_>>().join(",")
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split one CSV line honoring quoted fields and doubled quotes.
fn split_line(line: &str, line_no: usize) -> Result<Vec<String>, CsvError> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                values.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line: line_no });
    }

    values.push(current);
    Ok(values)
}
