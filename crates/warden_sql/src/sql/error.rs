use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum SqlError {
    #[error(transparent)]
    SqlxError(#[from] sqlx::Error),

    #[error("Failed to run sql migrations: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl SqlError {
    pub fn traced_query_error(err: sqlx::Error) -> Self {
        error!("Failed to run sql query: {err}");
        SqlError::SqlxError(err)
    }

    /// True when the failure is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SqlError::SqlxError(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some("23505")
            }
            _ => false,
        }
    }
}
