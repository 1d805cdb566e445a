use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::middleware::current_request_id;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, ToSchema)]
pub enum ErrorCode {
    #[serde(rename = "RES_4001")]
    NotFound,

    // Maintenance errors (5xxx)
    #[serde(rename = "MNT_5001")]
    MaintenanceFailed,
}

impl ErrorCode {
    /// Get numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 4001,
            ErrorCode::MaintenanceFailed => 5001,
        }
    }
}

/// Structured error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: ErrorCode,
    pub code_number: u16,
    pub request_id: String,
    pub timestamp: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Maintenance process failed: {0}")]
    MaintenanceFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::MaintenanceFailed(_) => ErrorCode::MaintenanceFailed,
            ApiError::NotFound(_) => ErrorCode::NotFound,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MaintenanceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log error with appropriate level
    fn log_error(&self, request_id: &str) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    request_id = %request_id,
                    error = %self,
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    request_id = %request_id,
                    error = %self,
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = current_request_id();
        let status = self.status_code();
        let code = self.error_code();

        self.log_error(&request_id);

        let body = ErrorResponse {
            detail: self.to_string(),
            code,
            code_number: code.code(),
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MaintenanceFailed("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::NotFound("route".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_maintenance_failure_body_embeds_fault_text() {
        let response =
            ApiError::MaintenanceFailed("archive path is not valid UTF-8".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            body.detail,
            "Maintenance process failed: archive path is not valid UTF-8"
        );
        assert_eq!(body.code, ErrorCode::MaintenanceFailed);
        assert_eq!(body.code_number, 5001);
        assert!(!body.request_id.is_empty());
    }
}
