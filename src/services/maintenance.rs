//! Monthly maintenance: have the billing service archive last month's readings
//! and reset, then confirm the archive landed where we expect it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::constants::MONTHLY_PERIOD;
use crate::error::{ApiError, Result};
use crate::middleware::metrics::track_maintenance_run;
use crate::models::{ArchivePeriod, MaintenanceResponse};
use crate::services::archive_store::ArchiveStore;
use crate::services::billing_client::{ArchiveOutcome, BillingApi};
use crate::services::clock::Clock;

/// Outcome of the archive step, before it is turned into a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub success: bool,
    pub archive_path: Option<PathBuf>,
}

impl ArchiveReport {
    fn failed() -> Self {
        Self {
            success: false,
            archive_path: None,
        }
    }
}

#[derive(Clone)]
pub struct MaintenanceService {
    billing: Arc<dyn BillingApi>,
    store: Arc<dyn ArchiveStore>,
    clock: Arc<dyn Clock>,
    archive_dir: PathBuf,
}

impl MaintenanceService {
    pub fn new(
        billing: Arc<dyn BillingApi>,
        store: Arc<dyn ArchiveStore>,
        clock: Arc<dyn Clock>,
        archive_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            billing,
            store,
            clock,
            archive_dir: archive_dir.into(),
        }
    }

    /// Trigger the downstream archive and look for the resulting CSV.
    ///
    /// Never fails: downstream rejections and transport errors are logged and
    /// reported as `success = false`.
    pub async fn archive_month_readings(&self) -> ArchiveReport {
        info!("Starting monthly archive process");

        match self.billing.archive_and_prepare(MONTHLY_PERIOD).await {
            Ok(ArchiveOutcome::Completed) => {
                let period = ArchivePeriod::preceding(self.clock.now().date_naive());
                let expected = period.archive_path(&self.archive_dir);

                let found = match self.store.exists(&expected).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!(
                            path = %expected.display(),
                            error = %e,
                            "Could not check for monthly archive file"
                        );
                        false
                    }
                };

                if found {
                    info!(
                        period = %period,
                        "Monthly archive completed successfully. File saved at: {}",
                        expected.display()
                    );
                    track_maintenance_run("archived");
                    ArchiveReport {
                        success: true,
                        archive_path: Some(expected),
                    }
                } else {
                    // Downstream says it archived; we just can't see the file.
                    warn!(
                        period = %period,
                        expected = %expected.display(),
                        "Monthly archive completed, but file not found."
                    );
                    track_maintenance_run("archive_missing");
                    ArchiveReport {
                        success: true,
                        archive_path: None,
                    }
                }
            }
            Ok(ArchiveOutcome::Rejected { status, detail }) => {
                error!(
                    status = %status,
                    "Monthly archive failed. Response: {}",
                    detail
                );
                track_maintenance_run("rejected");
                ArchiveReport::failed()
            }
            Err(e) => {
                error!(
                    error = ?e,
                    "Exception during monthly archive process: {}",
                    e
                );
                track_maintenance_run("transport_error");
                ArchiveReport::failed()
            }
        }
    }

    /// Run the archive step and build the caller-facing response.
    pub async fn perform_monthly_maintenance(&self) -> Result<MaintenanceResponse> {
        let report = self.archive_month_readings().await;

        let archive_path = report
            .archive_path
            .map(|path| {
                path.into_os_string().into_string().map_err(|raw| {
                    ApiError::MaintenanceFailed(format!(
                        "archive path is not valid UTF-8: {}",
                        Path::new(&raw).display()
                    ))
                })
            })
            .transpose()?;

        Ok(MaintenanceResponse::new(
            report.success,
            archive_path,
            self.clock.now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::billing_client::BillingClientError;
    use crate::services::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use reqwest::StatusCode;
    use std::io;
    use std::sync::Mutex;

    enum Reply {
        Completed,
        Rejected(u16, &'static str),
        Unreachable,
    }

    struct StubBilling {
        reply: Reply,
        periods: Mutex<Vec<String>>,
    }

    impl StubBilling {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                periods: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl BillingApi for StubBilling {
        async fn archive_and_prepare(
            &self,
            period: &str,
        ) -> std::result::Result<ArchiveOutcome, BillingClientError> {
            self.periods.lock().unwrap().push(period.to_string());
            match self.reply {
                Reply::Completed => Ok(ArchiveOutcome::Completed),
                Reply::Rejected(code, detail) => Ok(ArchiveOutcome::Rejected {
                    status: StatusCode::from_u16(code).unwrap(),
                    detail: detail.to_string(),
                }),
                Reply::Unreachable => {
                    // A real transport error from a request that cannot be built.
                    let err = reqwest::Client::new()
                        .post("http://[::1")
                        .send()
                        .await
                        .unwrap_err();
                    Err(BillingClientError::Transport(err))
                }
            }
        }
    }

    struct StubStore {
        present: io::Result<bool>,
        checked: Mutex<Vec<PathBuf>>,
    }

    impl StubStore {
        fn new(present: io::Result<bool>) -> Arc<Self> {
            Arc::new(Self {
                present,
                checked: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ArchiveStore for StubStore {
        async fn exists(&self, path: &Path) -> io::Result<bool> {
            self.checked.lock().unwrap().push(path.to_path_buf());
            match &self.present {
                Ok(found) => Ok(*found),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn march_15_2025() -> Arc<FixedClock> {
        Arc::new(FixedClock(
            FixedOffset::east_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2025, 3, 15, 9, 30, 0)
                .unwrap(),
        ))
    }

    fn service(billing: Arc<StubBilling>, store: Arc<StubStore>) -> MaintenanceService {
        MaintenanceService::new(billing, store, march_15_2025(), "/data/Archive")
    }

    #[tokio::test]
    async fn test_archive_found_reports_path() {
        let billing = StubBilling::new(Reply::Completed);
        let store = StubStore::new(Ok(true));
        let svc = service(billing.clone(), store.clone());

        let response = svc.perform_monthly_maintenance().await.unwrap();

        assert!(response.success);
        assert_eq!(response.message, "Monthly maintenance completed");
        assert_eq!(
            response.archive_path.as_deref(),
            Some("/data/Archive/monthly_2025-02.csv")
        );
        assert_eq!(response.timestamp, "2025-03-15T09:30:00+07:00");
        assert_eq!(*billing.periods.lock().unwrap(), vec!["monthly".to_string()]);
        assert_eq!(
            *store.checked.lock().unwrap(),
            vec![PathBuf::from("/data/Archive/monthly_2025-02.csv")]
        );
    }

    #[tokio::test]
    async fn test_archive_missing_is_still_success() {
        let svc = service(StubBilling::new(Reply::Completed), StubStore::new(Ok(false)));

        let response = svc.perform_monthly_maintenance().await.unwrap();

        assert!(response.success);
        assert_eq!(response.archive_path, None);
    }

    #[tokio::test]
    async fn test_store_error_is_treated_as_missing() {
        let store = StubStore::new(Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "permission denied",
        )));
        let svc = service(StubBilling::new(Reply::Completed), store);

        let report = svc.archive_month_readings().await;

        assert_eq!(
            report,
            ArchiveReport {
                success: true,
                archive_path: None
            }
        );
    }

    #[tokio::test]
    async fn test_downstream_rejection_reports_failure() {
        let store = StubStore::new(Ok(true));
        let svc = service(
            StubBilling::new(Reply::Rejected(500, "Failed to write archive")),
            store.clone(),
        );

        let response = svc.perform_monthly_maintenance().await.unwrap();

        assert!(!response.success);
        assert_eq!(response.message, "Error during maintenance");
        assert_eq!(response.archive_path, None);
        // detail is logged only
        assert!(!serde_json::to_string(&response)
            .unwrap()
            .contains("Failed to write archive"));
        assert!(store.checked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_reports_failure() {
        let svc = service(StubBilling::new(Reply::Unreachable), StubStore::new(Ok(true)));

        let response = svc.perform_monthly_maintenance().await.unwrap();

        assert!(!response.success);
        assert_eq!(response.archive_path, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_archive_path_is_server_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = PathBuf::from(OsStr::from_bytes(b"/data/\xffArchive"));
        let svc = MaintenanceService::new(
            StubBilling::new(Reply::Completed),
            StubStore::new(Ok(true)),
            march_15_2025(),
            dir,
        );

        let err = svc.perform_monthly_maintenance().await.unwrap_err();

        assert!(matches!(err, ApiError::MaintenanceFailed(_)));
        assert!(err
            .to_string()
            .starts_with("Maintenance process failed: archive path is not valid UTF-8"));
    }
}
