use thiserror::Error;
use warden_dispatch::DispatchError;
use warden_sql::sql::error::SqlError;
use warden_types::error::TypeError;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("No baseline found for feature '{0}'. Capture one first.")]
    BaselineMissing(String),

    #[error("No baselines found for {0}. Capture at least one baseline first.")]
    NoBaselines(String),

    #[error("No events found for {0}")]
    NoEvents(String),

    #[error("Not enough values for feature '{feature}'. Got {got}, min_samples is {required}")]
    NotEnoughData {
        feature: String,
        got: usize,
        required: usize,
    },

    #[error("No PSI computed. {0}")]
    NothingComputed(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Expected and actual distributions must have the same length ({expected} vs {actual})")]
    LengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    TypeError(#[from] TypeError),

    #[error(transparent)]
    SqlError(#[from] SqlError),

    #[error(transparent)]
    DispatchError(#[from] DispatchError),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl DriftError {
    /// Conditions that are routine during unattended operation: a key with
    /// no baselines yet, an empty day, or a thin sample. The worker logs
    /// these as informational skips and keeps going.
    pub fn is_expected_skip(&self) -> bool {
        matches!(
            self,
            DriftError::BaselineMissing(_)
                | DriftError::NoBaselines(_)
                | DriftError::NoEvents(_)
                | DriftError::NotEnoughData { .. }
                | DriftError::NothingComputed(_)
        )
    }

    /// True when the failure is the caller's fault and maps to a 400.
    pub fn is_client_error(&self) -> bool {
        self.is_expected_skip()
            || matches!(
                self,
                DriftError::InvalidInput(_)
                    | DriftError::LengthMismatch { .. }
                    | DriftError::TypeError(_)
            )
    }
}
