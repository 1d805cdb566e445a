// Business logic services
// Billing service client, archive lookup, maintenance workflow

pub mod archive_store;
pub mod billing_client;
pub mod clock;
pub mod maintenance;

pub use archive_store::{ArchiveStore, LocalArchiveStore};
pub use billing_client::{ArchiveOutcome, BillingApi, BillingClientError, HttpBillingClient};
pub use clock::{Clock, FixedClock, SystemClock};
pub use maintenance::{ArchiveReport, MaintenanceService};
