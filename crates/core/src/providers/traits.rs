use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::dashboard::DashboardMetrics;

/// Trait abstraction for every source of dashboard analytics.
///
/// The REST backend and the offline mock generator both implement this
/// trait, so the facade never cares where the numbers came from.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AnalyticsProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Whether the provider is reachable and reports itself operational.
    /// Transport failures count as "not healthy", not as errors.
    async fn health_check(&self) -> Result<bool, CoreError>;

    /// Fetch the full dashboard payload (KPIs, census, risk, trends).
    async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, CoreError>;
}
