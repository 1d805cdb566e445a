//! Router configuration: maintenance trigger, health, metrics and API docs.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::error::{ApiError, ErrorCode, ErrorResponse};
use crate::handlers::{self, health::HealthStatus};
use crate::middleware;
use crate::models::MaintenanceResponse;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(title = "Power Consumption Monthly Billing Service"),
    paths(
        handlers::maintenance::perform_monthly_maintenance,
        handlers::health::health_check,
        handlers::metrics::get_prometheus_metrics,
    ),
    components(schemas(MaintenanceResponse, ErrorResponse, ErrorCode, HealthStatus)),
    tags(
        (name = "maintenance", description = "Monthly archive and reset of meter readings"),
        (name = "health", description = "Liveness"),
        (name = "metrics", description = "Prometheus scrape endpoint")
    )
)]
pub struct ApiDoc;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let request_timeout = Duration::from_secs(app_state.config.request_timeout);

    Router::new()
        .route(
            "/perform_monthly_maintenance",
            post(handlers::maintenance::perform_monthly_maintenance),
        )
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_prometheus_metrics))
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_logger_middleware))
                .layer(axum::middleware::from_fn(middleware::metrics_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
