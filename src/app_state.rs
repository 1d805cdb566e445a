//! Application state shared across all handlers.

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::services;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Monthly archive trigger
    pub maintenance_service: services::MaintenanceService,
    /// Renders the Prometheus recorder for `/metrics`
    pub metrics_handle: PrometheusHandle,
}

impl axum::extract::FromRef<AppState> for services::MaintenanceService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.maintenance_service.clone()
    }
}
