pub mod baseline;
pub mod contracts;
pub mod error;
pub mod feature;
pub mod record;
pub mod severity;
pub mod util;

pub use baseline::{BaselineDefinition, FeatureBaseline, OTHER_BUCKET};
pub use feature::{FeatureType, FeatureValue};
pub use record::{
    Alert, DailyCost, DailyDrift, DailyMetric, Event, FeaturePsi, FeatureStats, ModelKey,
};
pub use severity::Severity;
pub use util::{day_window, parse_timezone};

/// Default number of equal-width bins for numeric baselines.
pub const DEFAULT_N_BINS: usize = 10;

/// Default number of kept categories before the other-bucket.
pub const DEFAULT_TOP_K_CATEGORIES: usize = 20;

/// Default per-feature sample floor for drift computation.
pub const DEFAULT_MIN_SAMPLES: usize = 10;

/// Default sample size for the most-recent-n baseline window.
pub const DEFAULT_BASELINE_N: i64 = 500;
