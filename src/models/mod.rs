// Data models and DTOs
// API response models, archive periods, etc.

pub mod maintenance;

pub use maintenance::{ArchivePeriod, MaintenanceResponse};
