use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::chart::AlignedRecord;

/// A single time-indexed value (timestamp key → count).
///
/// The key is kept as the raw string the upstream source sent: an ISO date,
/// an ISO date-time, or a free-form label. Merging only relies on string
/// equality; date parsing is used for ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: String,
    pub count: f64,
}

impl TimePoint {
    pub fn new(date: impl Into<String>, count: f64) -> Self {
        Self {
            date: date.into(),
            count,
        }
    }

    /// Calendar day of this point, if the key is a date or date-time.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_timestamp(&self.date).map(|ts| ts.date())
    }
}

/// Observed and forecast series sharing a timestamp domain.
///
/// Either side may be absent in the JSON payload and then deserializes empty.
/// Unknown fields are rejected so an error object is never read as an empty pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesPair {
    /// Historical, measured values
    #[serde(default)]
    pub actual: Vec<TimePoint>,

    /// Projected values; may overlap or extend past `actual`
    #[serde(default)]
    pub predicted: Vec<TimePoint>,
}

impl SeriesPair {
    pub fn new(actual: Vec<TimePoint>, predicted: Vec<TimePoint>) -> Self {
        Self { actual, predicted }
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty() && self.predicted.is_empty()
    }

    /// Merge both series into one ordered, per-timestamp sequence.
    pub fn align(&self) -> Vec<AlignedRecord> {
        crate::services::aligner::align_series(&self.actual, &self.predicted)
    }

    /// Project aligned records back into two series, dropping absent values.
    pub fn from_aligned(records: &[AlignedRecord]) -> Self {
        let actual = records
            .iter()
            .filter_map(|r| r.actual.map(|v| TimePoint::new(r.date.clone(), v)))
            .collect();
        let predicted = records
            .iter()
            .filter_map(|r| r.predicted.map(|v| TimePoint::new(r.date.clone(), v)))
            .collect();
        Self { actual, predicted }
    }
}

/// Parse a timestamp key into a date-time.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`
/// (optionally with fractional seconds) and RFC 3339 with an offset, which is
/// normalised to UTC. Returns `None` for anything else.
pub fn parse_timestamp(key: &str) -> Option<NaiveDateTime> {
    let key = key.trim();

    if let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(key, fmt) {
            return Some(ts);
        }
    }

    DateTime::parse_from_rfc3339(key)
        .ok()
        .map(|ts| ts.naive_utc())
}
