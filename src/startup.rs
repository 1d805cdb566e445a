//! Application startup and initialization logic.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{Config, LogFormat};
use crate::services;

/// Initialize tracing from `RUST_LOG`, falling back to the configured filter.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already initialized: {}", e);
    }
}

/// Initialize services and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!("🚀 Starting {}", crate::constants::SERVICE_TITLE);

    // Initialize Prometheus metrics exporter
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("✅ Prometheus metrics initialized");

    // No request timeout: the billing service decides how long archiving takes.
    let http_client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
    let billing = services::HttpBillingClient::new(http_client, config.main_api_url.clone());
    info!("✅ Billing client initialized (main API: {})", billing.base_url());

    check_archive_dir(config).await;

    let maintenance_service = services::MaintenanceService::new(
        Arc::new(billing),
        Arc::new(services::LocalArchiveStore::new()),
        Arc::new(services::SystemClock),
        config.archive_dir.clone(),
    );
    info!(
        "✅ Maintenance service initialized (archive dir: {})",
        config.archive_dir.display()
    );

    Ok(AppState {
        config: config.clone(),
        maintenance_service,
        metrics_handle,
    })
}

/// The billing service owns the archive directory; only warn when it is missing.
async fn check_archive_dir(config: &Config) {
    match tokio::fs::metadata(&config.archive_dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => warn!(
            "Archive path {} exists but is not a directory",
            config.archive_dir.display()
        ),
        Err(e) => warn!(
            "Archive directory {} is not accessible yet: {}",
            config.archive_dir.display(),
            e
        ),
    }
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
