use thiserror::Error;
use warden_sql::sql::error::SqlError;

#[derive(Error, Debug)]
pub enum CostError {
    #[error("COST_API_URL is not configured")]
    Disabled,

    #[error("Failed to create http client: {0}")]
    CreateClientError(String),

    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    #[error("Billing API returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("No stored TOTAL cost for {project_id} on {day}")]
    TotalMissing { project_id: String, day: String },

    #[error("Not enough historical TOTAL cost rows to compute a trailing average")]
    NotEnoughHistory,

    #[error(transparent)]
    SqlError(#[from] SqlError),
}
