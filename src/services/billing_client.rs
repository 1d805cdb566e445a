//! Client for the billing service ("main API") that owns the meter readings.
//!
//! The only operation used here is `POST /archive_and_prepare`, which makes the
//! billing service write the month's readings to CSV and clear them from memory.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::constants::{ARCHIVE_AND_PREPARE_PATH, UNKNOWN_DOWNSTREAM_ERROR};

/// What the billing service answered to an archive request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Downstream replied 200
    Completed,
    /// Downstream replied with any other status
    Rejected { status: StatusCode, detail: String },
}

#[derive(Debug, Error)]
pub enum BillingClientError {
    #[error("request to billing service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Error payload returned by the billing service
#[derive(Debug, Deserialize)]
struct DownstreamErrorBody {
    detail: Option<serde_json::Value>,
}

#[async_trait]
pub trait BillingApi: Send + Sync {
    /// Ask the billing service to archive `period` and reset its state.
    async fn archive_and_prepare(
        &self,
        period: &str,
    ) -> Result<ArchiveOutcome, BillingClientError>;
}

/// reqwest-backed billing client
#[derive(Clone)]
pub struct HttpBillingClient {
    client: Client,
    base_url: String,
}

impl HttpBillingClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            ARCHIVE_AND_PREPARE_PATH
        )
    }
}

#[async_trait]
impl BillingApi for HttpBillingClient {
    async fn archive_and_prepare(
        &self,
        period: &str,
    ) -> Result<ArchiveOutcome, BillingClientError> {
        let url = self.endpoint();
        debug!(url = %url, period = %period, "Calling billing service");

        let response = self
            .client
            .post(&url)
            .query(&[("period", period)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(ArchiveOutcome::Completed);
        }

        // A body we cannot read or parse still counts as a rejection.
        let body = response.json::<DownstreamErrorBody>().await.ok();
        Ok(ArchiveOutcome::Rejected {
            status,
            detail: extract_detail(body),
        })
    }
}

/// Pull `detail` out of a `{"detail": ...}` error body.
fn extract_detail(body: Option<DownstreamErrorBody>) -> String {
    match body {
        Some(DownstreamErrorBody {
            detail: Some(serde_json::Value::String(detail)),
        }) => detail,
        // FastAPI validation errors put a list here
        Some(DownstreamErrorBody {
            detail: Some(other),
        }) if !other.is_null() => other.to_string(),
        _ => UNKNOWN_DOWNSTREAM_ERROR.to_string(),
    }
}
