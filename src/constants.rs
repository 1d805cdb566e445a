//! Fixed values shared between the service and its collaborators.

/// Default base URL of the billing service ("main API").
pub const DEFAULT_MAIN_API_URL: &str = "http://localhost:8000";

/// Downstream endpoint that archives the month and resets in-memory readings.
pub const ARCHIVE_AND_PREPARE_PATH: &str = "/archive_and_prepare";

/// Value of the `period` query parameter sent downstream.
pub const MONTHLY_PERIOD: &str = "monthly";

/// Directory name (relative to the working directory) holding archives.
pub const ARCHIVE_DIR_NAME: &str = "Archive";

pub const DEFAULT_LOG_FILTER: &str = "billing_maintenance=debug,tower_http=debug";

pub const SERVICE_TITLE: &str = "Power Consumption Monthly Billing Service";

pub const MESSAGE_COMPLETED: &str = "Monthly maintenance completed";
pub const MESSAGE_FAILED: &str = "Error during maintenance";

/// Returned when the downstream error body carries no usable `detail`.
pub const UNKNOWN_DOWNSTREAM_ERROR: &str = "Unknown error";
