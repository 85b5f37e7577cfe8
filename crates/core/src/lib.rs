pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    chart::{AlignedRecord, ChartSummary},
    dashboard::{CensusPoint, DashboardMetrics},
    series::{SeriesPair, TimePoint},
    settings::Settings,
};
use providers::registry::ProviderRegistry;
use services::{
    chart_service::ChartService, forecast_service::ForecastService, noise::NoiseSource,
};

use errors::CoreError;

/// Main entry point for the census forecasting core library.
/// Holds the settings, the analytics providers, and the chart services.
#[must_use]
pub struct CensusDashboard {
    settings: Settings,
    registry: ProviderRegistry,
    chart_service: ChartService,
    forecast_service: ForecastService,
}

impl std::fmt::Debug for CensusDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CensusDashboard")
            .field("settings", &self.settings)
            .field("providers", &self.registry.provider_names())
            .finish()
    }
}

impl CensusDashboard {
    /// Create a dashboard backed by the REST API described in `settings`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let registry = ProviderRegistry::new_with_defaults(&settings);
        Self::with_registry(settings, registry)
    }

    /// Create a dashboard with an explicit set of providers.
    pub fn with_registry(settings: Settings, registry: ProviderRegistry) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            settings,
            registry,
            chart_service: ChartService::new(),
            forecast_service: ForecastService::new(),
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Fetching ────────────────────────────────────────────────────

    /// Fetch the full dashboard payload from the first provider that answers.
    pub async fn load_dashboard(&self) -> Result<DashboardMetrics, CoreError> {
        self.registry.fetch_dashboard().await
    }

    /// Fetch the dashboard and align its census data for charting.
    pub async fn load_census_chart(&self) -> Result<Vec<AlignedRecord>, CoreError> {
        let metrics = self.load_dashboard().await?;
        Ok(self.chart_service.census_chart(&metrics))
    }

    /// Health of every registered provider, in priority order.
    pub async fn provider_health(&self) -> Vec<(String, bool)> {
        self.registry.health().await
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Align an observed/forecast pair. Recomputed on every call.
    #[must_use]
    pub fn align(&self, pair: &SeriesPair) -> Vec<AlignedRecord> {
        self.chart_service.forecast_chart(pair)
    }

    /// Build a forecast from raw per-day counts and align it for charting.
    pub fn forecast_from_history(
        &self,
        points: &[TimePoint],
        noise: &mut dyn NoiseSource,
    ) -> Result<Vec<AlignedRecord>, CoreError> {
        let pair = self
            .forecast_service
            .build_forecast(points, &self.settings, noise)?;
        Ok(self.chart_service.forecast_chart(&pair))
    }

    /// Build a forecast from raw per-day counts as backend-style census rows.
    pub fn census_forecast_rows(
        &self,
        points: &[TimePoint],
        noise: &mut dyn NoiseSource,
    ) -> Result<Vec<CensusPoint>, CoreError> {
        self.forecast_service
            .build_census_rows(points, &self.settings, noise)
    }

    #[must_use]
    pub fn summarize(&self, records: &[AlignedRecord]) -> ChartSummary {
        self.chart_service.summarize(records)
    }
}
