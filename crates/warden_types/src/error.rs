use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Day {0} has no valid midnight in timezone {1}")]
    InvalidDayStart(String, String),

    #[error("Unknown baseline definition tag: {0}")]
    UnknownDefinitionTag(String),

    #[error("Baseline definition must be a tagged object or a bin-edge array")]
    MalformedDefinition,

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}
