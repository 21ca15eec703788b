use crate::sql::error::SqlError;
use crate::sql::traits::{
    AlertSqlLogic, BaselineSqlLogic, CostSqlLogic, DriftSqlLogic, EventSqlLogic, MetricSqlLogic,
};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use tracing::{debug, info, instrument};
use warden_settings::DatabaseSettings;

#[derive(Debug, Clone)]
pub struct PostgresClient {}

impl EventSqlLogic for PostgresClient {}
impl BaselineSqlLogic for PostgresClient {}
impl MetricSqlLogic for PostgresClient {}
impl DriftSqlLogic for PostgresClient {}
impl AlertSqlLogic for PostgresClient {}
impl CostSqlLogic for PostgresClient {}

impl PostgresClient {
    /// Create the connection pool and bring the schema up to date.
    #[instrument(skip(database_settings))]
    pub async fn create_db_pool(
        database_settings: &DatabaseSettings,
    ) -> Result<Pool<Postgres>, SqlError> {
        let pool = PgPoolOptions::new()
            .max_connections(database_settings.max_connections)
            .connect(&database_settings.connection_uri)
            .await
            .map_err(|e| SqlError::ConnectionError(e.to_string()))?;

        info!("Connected to database");

        Self::run_migrations(&pool).await?;

        Ok(pool)
    }

    pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), SqlError> {
        info!("Running migrations");
        sqlx::migrate!("src/migrations").run(pool).await?;
        debug!("Migrations complete");

        Ok(())
    }
}
