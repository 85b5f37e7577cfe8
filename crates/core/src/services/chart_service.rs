use crate::models::chart::{AlignedRecord, ChartSummary};
use crate::models::dashboard::DashboardMetrics;
use crate::models::series::SeriesPair;
use crate::services::aligner::align_series;

/// Generates chart-ready data sets from analytics payloads.
///
/// The core computes all the numbers — the frontend only renders.
/// Chart data includes:
/// - One row per timestamp with the actual and predicted census values
/// - Headline figures for legends and tooltips
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Align an observed/forecast pair for a dual-series chart.
    pub fn forecast_chart(&self, pair: &SeriesPair) -> Vec<AlignedRecord> {
        let records = align_series(&pair.actual, &pair.predicted);
        tracing::debug!(
            actual = pair.actual.len(),
            predicted = pair.predicted.len(),
            rows = records.len(),
            "aligned forecast chart"
        );
        records
    }

    /// Census chart from a dashboard payload, in either census shape.
    pub fn census_chart(&self, metrics: &DashboardMetrics) -> Vec<AlignedRecord> {
        let pair = metrics.census_data.clone().into_series_pair();
        if pair.is_empty() && !metrics.census_data.is_empty() {
            tracing::warn!("census payload has rows but no actual or predicted values");
        }
        self.forecast_chart(&pair)
    }

    pub fn summarize(&self, records: &[AlignedRecord]) -> ChartSummary {
        ChartSummary {
            points: records.len(),
            actual_points: records.iter().filter(|r| r.actual.is_some()).count(),
            predicted_points: records.iter().filter(|r| r.predicted.is_some()).count(),
            overlap_points: records.iter().filter(|r| r.is_overlap()).count(),
            first_date: records.first().map(|r| r.date.clone()),
            last_date: records.last().map(|r| r.date.clone()),
            peak_actual: records.iter().filter_map(|r| r.actual).reduce(f64::max),
            peak_predicted: records.iter().filter_map(|r| r.predicted).reduce(f64::max),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
