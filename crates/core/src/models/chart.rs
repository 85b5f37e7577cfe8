use serde::{Deserialize, Serialize};

/// A single merged row for dual-series chart rendering.
///
/// The core generates these — the frontend just renders them.
/// `None` means "no data for this series at this timestamp" and serializes
/// as `null`; it is never conflated with a zero count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRecord {
    /// Timestamp key shared by both series (category axis value)
    pub date: String,

    /// Observed value, if the observed series has a point here
    pub actual: Option<f64>,

    /// Forecast value, if the forecast series has a point here
    pub predicted: Option<f64>,
}

impl AlignedRecord {
    pub fn observed(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            actual: Some(value),
            predicted: None,
        }
    }

    pub fn forecast(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            actual: None,
            predicted: Some(value),
        }
    }

    /// True when both series have a value at this timestamp.
    pub fn is_overlap(&self) -> bool {
        self.actual.is_some() && self.predicted.is_some()
    }
}

/// Headline numbers for an aligned chart (legend badges, tooltips).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    /// Total rows on the category axis
    pub points: usize,

    /// Rows carrying an observed value
    pub actual_points: usize,

    /// Rows carrying a forecast value
    pub predicted_points: usize,

    /// Rows carrying both (e.g., the bridge point)
    pub overlap_points: usize,

    pub first_date: Option<String>,
    pub last_date: Option<String>,

    /// Highest observed value, if any
    pub peak_actual: Option<f64>,

    /// Highest forecast value, if any
    pub peak_predicted: Option<f64>,
}
