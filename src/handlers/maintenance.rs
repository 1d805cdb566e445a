use axum::{extract::State, response::Json};

use crate::error::{ApiError, ErrorResponse};
use crate::models::MaintenanceResponse;
use crate::services::MaintenanceService;

/// Perform monthly maintenance
///
/// Asks the billing service to save this month's meter readings as CSV and
/// clear them from memory. Archives are written to `Archive/monthly_YYYY-MM.csv`.
///
/// Requests outliving `REQUEST_TIMEOUT` are cut off by the router's timeout
/// layer with a bare 408 and an empty body.
#[utoipa::path(
    post,
    path = "/perform_monthly_maintenance",
    tag = "maintenance",
    responses(
        (status = 200, description = "Maintenance attempted; see `success`", body = MaintenanceResponse),
        (status = 408, description = "Inbound request timeout elapsed; empty body"),
        (status = 500, description = "Maintenance process failed", body = ErrorResponse)
    )
)]
pub async fn perform_monthly_maintenance(
    State(service): State<MaintenanceService>,
) -> Result<Json<MaintenanceResponse>, ApiError> {
    let response = service.perform_monthly_maintenance().await?;
    Ok(Json(response))
}
