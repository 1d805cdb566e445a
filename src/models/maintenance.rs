use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

use crate::constants::{MESSAGE_COMPLETED, MESSAGE_FAILED};

/// Result of a monthly maintenance run as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceResponse {
    pub success: bool,
    pub message: String,
    /// ISO-8601 instant at which this response was built
    pub timestamp: String,
    /// Location of the archived CSV, `null` when it could not be found
    pub archive_path: Option<String>,
}

impl MaintenanceResponse {
    pub fn new(success: bool, archive_path: Option<String>, at: DateTime<FixedOffset>) -> Self {
        Self {
            success,
            message: if success {
                MESSAGE_COMPLETED.to_string()
            } else {
                MESSAGE_FAILED.to_string()
            },
            timestamp: at.to_rfc3339(),
            archive_path,
        }
    }
}

/// The calendar month whose readings get archived: always the month
/// before the invocation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePeriod {
    pub year: i32,
    pub month: u32,
}

impl ArchivePeriod {
    /// Month preceding `date`. January rolls back to December of the prior year.
    pub fn preceding(date: NaiveDate) -> Self {
        if date.month() == 1 {
            Self {
                year: date.year() - 1,
                month: 12,
            }
        } else {
            Self {
                year: date.year(),
                month: date.month() - 1,
            }
        }
    }

    /// `monthly_YYYY-MM.csv`
    pub fn file_name(&self) -> String {
        format!("monthly_{}.csv", self)
    }

    pub fn archive_path(&self, archive_dir: &Path) -> PathBuf {
        archive_dir.join(self.file_name())
    }
}

impl std::fmt::Display for ArchivePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
