// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Persisted result records.
//!
//! One [`ResultRecord`] is written per client per run. The JSON field names
//! (`duration`, `durationMs`, `result`, `timestamp`) are the on-disk format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timing and raw response of one client call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Duration as `seconds:milliseconds`
    pub duration: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Response payload exactly as returned by the client
    pub result: serde_json::Value,
    /// When the record was captured
    #[serde(with = "iso8601_millis")]
    pub timestamp: DateTime<Utc>,
}

impl ResultRecord {
    /// Create a record captured now.
    pub fn new(duration_ms: u64, result: serde_json::Value) -> Self {
        Self {
            duration: format_duration(duration_ms),
            duration_ms,
            result,
            timestamp: Utc::now(),
        }
    }

    /// True if `duration` and `duration_ms` describe the same value.
    pub fn is_consistent(&self) -> bool {
        parse_duration(&self.duration) == Some(self.duration_ms)
    }
}

/// Format milliseconds as `seconds:milliseconds`.
///
/// Seconds are not padded; milliseconds are always three digits.
///
/// ```
/// use sdk_parity_benchmarks::format_duration;
///
/// assert_eq!(format_duration(1500), "1:500");
/// assert_eq!(format_duration(45), "0:045");
/// ```
pub fn format_duration(ms: u64) -> String {
    format!("{}:{:03}", ms / 1000, ms % 1000)
}

/// Parse a `seconds:milliseconds` string back into milliseconds.
pub fn parse_duration(formatted: &str) -> Option<u64> {
    let (secs, millis) = formatted.split_once(':')?;
    if millis.len() != 3 || secs.is_empty() {
        return None;
    }
    let secs: u64 = secs.parse().ok()?;
    let millis: u64 = millis.parse().ok()?;
    secs.checked_mul(1000)?.checked_add(millis)
}

mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
