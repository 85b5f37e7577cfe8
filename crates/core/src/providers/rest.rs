use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::{redact_query, CoreError};
use crate::models::dashboard::DashboardMetrics;
use crate::models::settings::Settings;
use super::traits::AnalyticsProvider;

const PROVIDER_NAME: &str = "REST API";

/// Analytics provider backed by the dashboard's REST backend.
///
/// - **Health**: `GET {base}/` → `{ "status": "operational" }`
/// - **Dashboard**: `GET {base}{prefix}/dashboard/` → [`DashboardMetrics`]
pub struct RestAnalyticsProvider {
    client: Client,
    root_url: String,
    dashboard_url: String,
}

impl RestAnalyticsProvider {
    pub fn new(settings: &Settings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            root_url: format!("{}/", settings.api_base_url.trim_end_matches('/')),
            dashboard_url: settings.endpoint("dashboard/"),
        }
    }

    pub fn dashboard_url(&self) -> &str {
        &self.dashboard_url
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }
}

// ── Backend response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AnalyticsProvider for RestAnalyticsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn health_check(&self) -> Result<bool, CoreError> {
        let resp = match self.client.get(&self.root_url).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "health check returned non-success status");
                return Ok(false);
            }
            Err(e) => {
                tracing::warn!(error = %redact_query(&e.to_string()), "health check request failed");
                return Ok(false);
            }
        };

        match resp.json::<HealthResponse>().await {
            Ok(body) => Ok(body.status == "operational"),
            Err(e) => {
                tracing::warn!(error = %e, "health check body was not valid JSON");
                Ok(false)
            }
        }
    }

    async fn get_dashboard_metrics(&self) -> Result<DashboardMetrics, CoreError> {
        let resp = self.client.get(&self.dashboard_url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to load analytics (HTTP {status}): {}", error_detail(&body)),
            });
        }

        let metrics: DashboardMetrics = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse dashboard response: {e}"),
        })?;

        tracing::debug!(
            census_empty = metrics.census_data.is_empty(),
            risk_buckets = metrics.population_risk.len(),
            "fetched dashboard metrics"
        );
        Ok(metrics)
    }
}

/// Pull the `detail` field out of a FastAPI-style error body, falling back
/// to the raw text.
pub fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => err.detail,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
