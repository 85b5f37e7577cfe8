use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::sync::Mutex;

use crate::errors::CoreError;
use crate::models::dashboard::{
    aggregate_population_risk, CensusData, CensusPoint, DashboardMetrics, FeatureImportance,
    KpiMetrics, ReadmissionPoint,
};
use crate::services::noise::{NoiseSource, OsNoise};
use super::traits::AnalyticsProvider;

const PROVIDER_NAME: &str = "Mock";

const BASE_ACTUAL: f64 = 1200.0;
const PREDICTION_OFFSET: f64 = 50.0;
const CENSUS_SPREAD: i64 = 200;
const MOCK_CAPACITY: f64 = 1500.0;

/// Window of generated census data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    /// 24 hourly points on the anchor day
    Hours24,
    /// 7 daily points ending at the anchor
    #[default]
    Days7,
    /// 30 daily points ending at the anchor
    Days30,
}

impl TimeRange {
    /// Parse the dashboard's range selector (`24h`, `7d`, `30d`).
    /// Anything unrecognised falls back to the 30-day view.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "24h" => TimeRange::Hours24,
            "7d" => TimeRange::Days7,
            _ => TimeRange::Days30,
        }
    }

    pub fn points(&self) -> usize {
        match self {
            TimeRange::Hours24 => 24,
            TimeRange::Days7 => 7,
            TimeRange::Days30 => 30,
        }
    }

    /// Timestamp keys for this range, oldest first.
    pub fn keys(&self, anchor: NaiveDate) -> Vec<String> {
        match self {
            TimeRange::Hours24 => (0..24)
                .map(|h| format!("{}T{h:02}:00:00", anchor.format("%Y-%m-%d")))
                .collect(),
            TimeRange::Days7 | TimeRange::Days30 => {
                let n = self.points() as u64;
                (0..n)
                    .filter_map(|i| anchor.checked_sub_days(Days::new(n - 1 - i)))
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .collect()
            }
        }
    }
}

/// Offline analytics provider that synthesises a plausible dashboard.
///
/// Census values jitter around a fixed baseline; everything else is a
/// static fixture. Useful for demos and for running the UI without a
/// backend.
pub struct MockAnalyticsProvider {
    range: TimeRange,
    anchor: NaiveDate,
    noise: Mutex<Box<dyn NoiseSource + Send>>,
}

impl MockAnalyticsProvider {
    pub fn new(range: TimeRange, anchor: NaiveDate) -> Self {
        Self::with_noise(range, anchor, Box::new(OsNoise))
    }

    pub fn with_noise(
        range: TimeRange,
        anchor: NaiveDate,
        noise: Box<dyn NoiseSource + Send>,
    ) -> Self {
        Self {
            range,
            anchor,
            noise: Mutex::new(noise),
        }
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    fn census_rows(&self) -> Result<Vec<CensusPoint>, CoreError> {
        let mut noise = self.noise.lock().unwrap_or_else(|e| e.into_inner());
        self.range
            .keys(self.anchor)
            .into_iter()
            .map(|time| -> Result<CensusPoint, CoreError> {
                let actual = BASE_ACTUAL + noise.sample(0, CENSUS_SPREAD)? as f64;
                let predicted =
                    BASE_ACTUAL + PREDICTION_OFFSET + noise.sample(0, CENSUS_SPREAD)? as f64;
                Ok(CensusPoint {
                    time,
                    actual: Some(actual),
                    predicted: Some(predicted),
                    capacity: Some(MOCK_CAPACITY),
                })
            })
            .collect()
    }
}

fn feature_importance_fixture() -> Vec<FeatureImportance> {
    [
        ("Prior Readmissions", 0.35),
        ("Comorbidity Index", 0.25),
        ("Age > 75", 0.15),
        ("Recent Sepsis", 0.10),
        ("Low SpO2 Avg", 0.08),
        ("High Systolic BP", 0.07),
    ]
    .into_iter()
    .map(|(feature, importance)| FeatureImportance {
        feature: feature.to_string(),
        importance,
    })
    .collect()
}

fn readmission_trend_fixture() -> Vec<ReadmissionPoint> {
    [
        ("Jan", 14.2),
        ("Feb", 13.8),
        ("Mar", 13.5),
        ("Apr", 12.9),
        ("May", 12.1),
        ("Jun", 11.8),
    ]
    .into_iter()
    .map(|(month, rate)| ReadmissionPoint {
        month: month.to_string(),
        rate,
    })
    .collect()
}

fn population_risk_rows() -> Vec<(String, u64)> {
    vec![
        ("low".to_string(), 620),
        ("Moderate".to_string(), 410),
        ("HIGH".to_string(), 168),
        ("critical".to_string(), 50),
    ]
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AnalyticsProvider for MockAnalyticsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn health_check(&self) -> Result<bool, CoreError> {
        Ok(true)
    }

    async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, CoreError> {
        let census = self.census_rows()?;

        Ok(DashboardMetrics {
            kpi: KpiMetrics {
                active_patients: 1248,
                avg_los: 4.2,
                readmission_rate: 11.8,
                virtual_bed_utilization: 83.0,
            },
            census_data: CensusData::Rows(census),
            population_risk: aggregate_population_risk(&population_risk_rows()),
            feature_importance: feature_importance_fixture(),
            readmission_trend: readmission_trend_fixture(),
        })
    }
}
