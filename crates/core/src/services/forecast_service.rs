use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::errors::CoreError;
use crate::models::dashboard::CensusPoint;
use crate::models::series::{SeriesPair, TimePoint};
use crate::models::settings::{Settings, MAX_HISTORY_DAYS, MAX_HORIZON_DAYS};
use crate::services::noise::NoiseSource;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Builds the census forecast: a gap-free daily history plus a short
/// trend projection.
///
/// The forecast series starts with a bridge point on the last observed day
/// (equal to its actual value) so the two lines touch on the chart.
pub struct ForecastService;

impl ForecastService {
    pub fn new() -> Self {
        Self
    }

    /// Turn raw per-day admission counts into one point per calendar day.
    ///
    /// The window ends at the latest parseable date and spans `window_days`
    /// days. Counts for the same day are summed. A day with no admissions
    /// repeats the previous day's value; leading empty days stay at zero.
    /// Points with unparseable dates are skipped.
    pub fn fill_history(&self, points: &[TimePoint], window_days: u32) -> Vec<TimePoint> {
        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for point in points {
            match point.day() {
                Some(day) => *per_day.entry(day).or_insert(0.0) += point.count,
                None => tracing::warn!(date = %point.date, "skipping history point with unparseable date"),
            }
        }

        let Some((&anchor, _)) = per_day.last_key_value() else {
            return Vec::new();
        };
        if window_days == 0 {
            return Vec::new();
        }

        let start = anchor
            .checked_sub_days(Days::new(u64::from(window_days - 1)))
            .unwrap_or(NaiveDate::MIN);

        let span = (anchor - start).num_days() + 1;
        let mut filled: Vec<TimePoint> =
            Vec::with_capacity(span.clamp(0, i64::from(MAX_HISTORY_DAYS)) as usize);
        let mut day = start;
        while day <= anchor {
            let mut value = per_day.get(&day).copied().unwrap_or(0.0);

            // Empty days repeat the previous value
            if value == 0.0 {
                if let Some(prev) = filled.last() {
                    value = prev.count;
                }
            }

            filled.push(TimePoint::new(day.format(DAY_FORMAT).to_string(), value));

            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        tracing::debug!(
            %anchor,
            days = filled.len(),
            raw_points = points.len(),
            "filled census history"
        );
        filled
    }

    /// Project `horizon_days` daily values past the end of `history`.
    ///
    /// Each step is `max(0, previous + trend + noise)`. The returned series
    /// begins with the bridge point. Empty history yields an empty series.
    pub fn project(
        &self,
        history: &[TimePoint],
        horizon_days: u32,
        daily_trend: f64,
        noise_range: (i64, i64),
        noise: &mut dyn NoiseSource,
    ) -> Result<Vec<TimePoint>, CoreError> {
        let Some(last) = history.last() else {
            return Ok(Vec::new());
        };
        let last_day = last.day().ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Last history point has an unparseable date: {}",
                last.date
            ))
        })?;

        if last_day
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .is_none()
        {
            return Err(CoreError::ValidationError(format!(
                "Forecast horizon of {horizon_days} days overflows the calendar after {last_day}"
            )));
        }

        let mut projected =
            Vec::with_capacity(horizon_days.min(MAX_HORIZON_DAYS) as usize + 1);
        projected.push(TimePoint::new(last.date.clone(), last.count));

        let (noise_min, noise_max) = noise_range;
        let mut last_value = last.count;
        for i in 1..=horizon_days {
            let day = last_day
                .checked_add_days(Days::new(u64::from(i)))
                .ok_or_else(|| {
                    CoreError::ValidationError(format!(
                        "Forecast horizon overflows the calendar after {last_day}"
                    ))
                })?;

            let jitter = noise.sample(noise_min, noise_max)?;
            let next_value = (last_value + daily_trend + jitter as f64).max(0.0);

            projected.push(TimePoint::new(day.format(DAY_FORMAT).to_string(), next_value));
            last_value = next_value;
        }

        Ok(projected)
    }

    /// Fill history and project it forward using the configured window,
    /// horizon, trend, and noise range.
    pub fn build_forecast(
        &self,
        points: &[TimePoint],
        settings: &Settings,
        noise: &mut dyn NoiseSource,
    ) -> Result<SeriesPair, CoreError> {
        let actual = self.fill_history(points, settings.history_days);
        let predicted = self.project(
            &actual,
            settings.horizon_days,
            settings.daily_trend,
            (settings.noise_min, settings.noise_max),
            noise,
        )?;
        Ok(SeriesPair::new(actual, predicted))
    }

    /// Forecast in the backend's row shape: one joined row per day, each
    /// carrying the configured bed capacity.
    pub fn build_census_rows(
        &self,
        points: &[TimePoint],
        settings: &Settings,
        noise: &mut dyn NoiseSource,
    ) -> Result<Vec<CensusPoint>, CoreError> {
        let pair = self.build_forecast(points, settings, noise)?;
        Ok(pair
            .align()
            .into_iter()
            .map(|record| CensusPoint {
                time: record.date,
                actual: record.actual,
                predicted: record.predicted,
                capacity: Some(settings.capacity),
            })
            .collect())
    }
}

impl Default for ForecastService {
    fn default() -> Self {
        Self::new()
    }
}
