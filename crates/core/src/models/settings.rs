use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Longest forecast horizon the dashboard will project, in days.
pub const MAX_HORIZON_DAYS: u32 = 90;

/// Longest history window the census chart will fill, in days (10 years).
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "CENSUS_API_URL";

/// Runtime configuration for fetching and charting census data.
///
/// Every field has a default, so a partial JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend root, without the API prefix (e.g., "http://localhost:8000").
    pub api_base_url: String,

    /// Versioned API prefix appended to the base URL.
    pub api_prefix: String,

    /// Per-request timeout for the REST provider (native only).
    pub request_timeout_secs: u64,

    /// Days of history shown before the forecast starts.
    pub history_days: u32,

    /// Days projected past the last observed day.
    pub horizon_days: u32,

    /// Added to each projected day before noise.
    pub daily_trend: f64,

    /// Noise range for projections: `noise_min` inclusive, `noise_max` exclusive.
    pub noise_min: i64,
    pub noise_max: i64,

    /// Bed capacity stamped on every generated census row.
    pub capacity: f64,

    /// Whether the chart bridges gaps between points. Rendering only.
    pub connect_nulls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            request_timeout_secs: 30,
            history_days: 30,
            horizon_days: 7,
            daily_trend: 2.0,
            noise_min: -10,
            noise_max: 15,
            capacity: 2000.0,
            connect_nulls: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Apply `CENSUS_API_URL` from the environment, if set and non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
        self
    }

    /// Full URL of an API endpoint, e.g. `endpoint("dashboard/")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(CoreError::InvalidSettings(
                "api_base_url must not be empty".into(),
            ));
        }
        if self.horizon_days == 0 || self.horizon_days > MAX_HORIZON_DAYS {
            return Err(CoreError::InvalidSettings(format!(
                "horizon_days must be between 1 and {MAX_HORIZON_DAYS}, got {}",
                self.horizon_days
            )));
        }
        if self.history_days == 0 || self.history_days > MAX_HISTORY_DAYS {
            return Err(CoreError::InvalidSettings(format!(
                "history_days must be between 1 and {MAX_HISTORY_DAYS}, got {}",
                self.history_days
            )));
        }
        if self.noise_min > self.noise_max {
            return Err(CoreError::InvalidSettings(format!(
                "noise_min ({}) must not exceed noise_max ({})",
                self.noise_min, self.noise_max
            )));
        }
        if !self.daily_trend.is_finite() {
            return Err(CoreError::InvalidSettings(
                "daily_trend must be a finite number".into(),
            ));
        }
        if !self.capacity.is_finite() || self.capacity < 0.0 {
            return Err(CoreError::InvalidSettings(format!(
                "capacity must be a non-negative number, got {}",
                self.capacity
            )));
        }
        Ok(())
    }
}
