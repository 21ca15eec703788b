pub mod alert;
pub mod baseline;
pub mod binning;
pub mod drift;
pub mod error;
pub mod psi;
pub mod utils;

pub use alert::{process_drift_alert, DRIFT_RULE};
pub use baseline::{capture_feature_baseline, BaselineWindow};
pub use drift::{compute_drift_all, compute_feature_drift};
pub use error::DriftError;
