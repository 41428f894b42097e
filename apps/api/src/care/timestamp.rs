//! Timestamp coercion.
//!
//! Plants and care logs reach us from an external document store that is not
//! consistent about how it writes times: plain epoch milliseconds, ISO
//! strings, or a `{seconds, nanoseconds}` wrapper. Every timestamp goes
//! through [`to_epoch_millis`] before any arithmetic happens.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest magnitude accepted for an epoch-millis value (±100 000 000 days).
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// A timestamp in any of the shapes the persistence layer produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Whole epoch milliseconds. Listed first so integers stay integers.
    Integer(i64),
    Millis(f64),
    Seconds {
        #[serde(alias = "_seconds")]
        seconds: f64,
        #[serde(default, alias = "_nanoseconds", skip_serializing_if = "Option::is_none")]
        nanoseconds: Option<f64>,
    },
    Date(DateTime<Utc>),
    Text(String),
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::Integer(ms)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Date(dt)
    }
}

/// Converts any accepted timestamp shape to milliseconds since the epoch.
/// Values that cannot be interpreted are `None`, never zero.
pub fn to_epoch_millis(value: &Timestamp) -> Option<i64> {
    match value {
        Timestamp::Integer(ms) => finite_millis(*ms as f64),
        Timestamp::Millis(ms) => finite_millis(*ms),
        Timestamp::Seconds {
            seconds,
            nanoseconds,
        } => {
            let nanos = nanoseconds.filter(|n| n.is_finite()).unwrap_or(0.0);
            finite_millis(seconds * 1000.0 + nanos / 1_000_000.0)
        }
        Timestamp::Date(dt) => Some(dt.timestamp_millis()),
        Timestamp::Text(text) => parse_text(text),
    }
}

/// Same as [`to_epoch_millis`] but tolerates an absent field.
pub fn opt_epoch_millis(value: Option<&Timestamp>) -> Option<i64> {
    value.and_then(to_epoch_millis)
}

fn finite_millis(ms: f64) -> Option<i64> {
    if ms.is_finite() && ms.abs() <= MAX_EPOCH_MILLIS {
        Some(ms.round() as i64)
    } else {
        None
    }
}

fn parse_text(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    // Bare calendar dates mean midnight UTC of that day.
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    None
}
