pub mod metrics;
pub mod request_logger;

pub use metrics::{metrics_middleware, track_maintenance_run};
pub use request_logger::{current_request_id, request_logger_middleware};
