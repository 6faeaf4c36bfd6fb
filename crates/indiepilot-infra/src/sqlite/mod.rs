//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Activity tables are shared with the app that
//! records them, so rows this crate cannot decode are skipped with a warning
//! instead of failing the whole request.

pub mod activity;
pub mod pool;
pub mod settings;
pub mod snapshot;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::sqlite::SqliteRow;

/// Why a stored row could not be mapped to a domain value.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RowError {
    #[error("column error: {0}")]
    Column(#[from] sqlx::Error),

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("invalid id: {0}")]
    Id(#[from] uuid::Error),

    #[error("unknown jar '{0}'")]
    Jar(String),
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and the naive ISO-8601 forms (`T` or space separated,
/// optional fractional seconds, or a bare date), the latter read as UTC.
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RowError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| RowError::Timestamp(s.to_string()))
}

pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Decode every row, dropping (and logging) the ones that fail.
pub(crate) fn decode_rows<T>(
    table: &'static str,
    rows: &[SqliteRow],
    decode: impl Fn(&SqliteRow) -> Result<T, RowError>,
) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match decode(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(table, error = %e, "skipping malformed row");
                None
            }
        })
        .collect()
}
