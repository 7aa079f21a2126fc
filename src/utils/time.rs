//! Time utilities: parsing report timestamps in the two client formats,
//! formatting for the store, lenient parsing for audit context.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;

/// Format used when handing a timestamp to the store.
pub const STORE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a report time as the clients send it.
///
/// Two shapes are accepted:
///  - `YYYY-MM-DDTHH:MM:SS[.fff]`, where the subsecond part is truncated, not rounded
///  - `YYYY-MM-DD HH:MM:SS`
///
/// Anything else is a validation error carrying the parse reason.
pub fn parse_report_time(input: &str) -> AppResult<NaiveDateTime> {
    let s = input.trim();
    let parsed = if s.contains('T') {
        let head = s.split('.').next().unwrap_or(s);
        NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S")
    } else {
        NaiveDateTime::parse_from_str(s, STORE_FORMAT)
    };
    parsed.map_err(|e| AppError::InvalidDate(format!("{}: {}", input, e)))
}

/// Lenient variant used for audit context timestamps: unparsable input
/// degrades to None instead of failing the operation.
pub fn parse_report_time_lenient(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    parse_report_time(s).ok()
}

/// Render a timestamp the way the store expects it: `YYYY-MM-DD HH:MM:SS`.
pub fn to_store_string(dt: &NaiveDateTime) -> String {
    dt.format(STORE_FORMAT).to_string()
}
