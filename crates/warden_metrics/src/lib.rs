pub mod daily;
pub mod error;
pub mod stats;

pub use daily::compute_daily_metrics;
pub use error::MetricError;
