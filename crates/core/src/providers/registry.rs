use crate::errors::CoreError;
use crate::models::dashboard::DashboardMetrics;
use crate::models::settings::Settings;

use super::rest::RestAnalyticsProvider;
use super::traits::AnalyticsProvider;

/// Registry of analytics providers, tried in registration order.
///
/// Typical setup is the REST backend first with the mock generator as an
/// offline fallback.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn AnalyticsProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the REST backend from `settings`.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RestAnalyticsProvider::new(settings)));
        registry
    }

    /// Register a new analytics provider.
    pub fn register(&mut self, provider: Box<dyn AnalyticsProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Names of registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Fetch the dashboard from the first provider that succeeds.
    pub async fn fetch_dashboard(&self) -> Result<DashboardMetrics, CoreError> {
        if self.providers.is_empty() {
            return Err(CoreError::ServiceUnavailable(
                "no analytics providers registered".into(),
            ));
        }

        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.get_dashboard_metrics().await {
                Ok(metrics) => {
                    tracing::debug!(provider = provider.name(), "dashboard loaded");
                    return Ok(metrics);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "provider failed, trying next");
                    failures.push(format!("{}: {e}", provider.name()));
                }
            }
        }

        Err(CoreError::ServiceUnavailable(failures.join("; ")))
    }

    /// Health of every registered provider, in priority order.
    pub async fn health(&self) -> Vec<(String, bool)> {
        let mut report = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let healthy = provider.health_check().await.unwrap_or(false);
            report.push((provider.name().to_string(), healthy));
        }
        report
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
