use serde::{Deserialize, Serialize};

use super::series::{SeriesPair, TimePoint};

/// Headline KPI cards at the top of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    /// Admissions inside the census window
    #[serde(default)]
    pub active_patients: u64,

    /// Average length of stay, in days
    #[serde(default)]
    pub avg_los: f64,

    /// Readmission rate, percent
    #[serde(default)]
    pub readmission_rate: f64,

    /// Census as a percentage of virtual bed capacity
    #[serde(default)]
    pub virtual_bed_utilization: f64,
}

/// One row of the census chart as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusPoint {
    #[serde(alias = "date")]
    pub time: String,
    #[serde(default)]
    pub actual: Option<f64>,
    #[serde(default)]
    pub predicted: Option<f64>,
    #[serde(default)]
    pub capacity: Option<f64>,
}

/// Census payload in either of the two shapes seen on the wire.
///
/// The backend emits pre-joined rows; forecasting clients emit the split
/// `{ actual: [...], predicted: [...] }` form. Both reduce to a [`SeriesPair`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CensusData {
    Rows(Vec<CensusPoint>),
    Split(SeriesPair),
}

impl Default for CensusData {
    fn default() -> Self {
        CensusData::Rows(Vec::new())
    }
}

impl CensusData {
    pub fn into_series_pair(self) -> SeriesPair {
        match self {
            CensusData::Split(pair) => pair,
            CensusData::Rows(rows) => {
                let actual = rows
                    .iter()
                    .filter_map(|r| r.actual.map(|v| TimePoint::new(r.time.clone(), v)))
                    .collect();
                let predicted = rows
                    .iter()
                    .filter_map(|r| r.predicted.map(|v| TimePoint::new(r.time.clone(), v)))
                    .collect();
                SeriesPair::new(actual, predicted)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CensusData::Rows(rows) => rows.is_empty(),
            CensusData::Split(pair) => pair.is_empty(),
        }
    }
}

/// Patient risk tier used by the population-risk donut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    /// Case-insensitive parse; `moderate` is an alias for `Medium`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" | "moderate" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Critical => write!(f, "Critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBucket {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadmissionPoint {
    pub month: String,
    pub rate: f64,
}

/// Full response of the dashboard analytics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(default)]
    pub kpi: KpiMetrics,
    #[serde(default)]
    pub census_data: CensusData,
    #[serde(default)]
    pub population_risk: Vec<RiskBucket>,
    #[serde(default)]
    pub feature_importance: Vec<FeatureImportance>,
    #[serde(default)]
    pub readmission_trend: Vec<ReadmissionPoint>,
}

/// Fold raw `(risk_level, count)` rows into the four fixed buckets.
///
/// Always returns Low, Medium, High, Critical in that order. Rows with an
/// unknown level are dropped.
pub fn aggregate_population_risk(rows: &[(String, u64)]) -> Vec<RiskBucket> {
    let mut totals = [0u64; 4];
    for (raw, count) in rows {
        match RiskLevel::parse(raw) {
            Some(level) => totals[level as usize] += count,
            None => tracing::debug!(level = %raw, "dropping unknown risk level"),
        }
    }

    RiskLevel::ALL
        .iter()
        .zip(totals)
        .map(|(level, value)| RiskBucket {
            name: level.to_string(),
            value,
        })
        .collect()
}
