use thiserror::Error;
use warden_sql::sql::error::SqlError;
use warden_types::error::TypeError;

#[derive(Error, Debug)]
pub enum MetricError {
    #[error(transparent)]
    TypeError(#[from] TypeError),

    #[error(transparent)]
    SqlError(#[from] SqlError),
}
