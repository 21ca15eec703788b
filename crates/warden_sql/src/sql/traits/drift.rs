use crate::sql::error::SqlError;
use crate::sql::query::Queries;
use crate::sql::schema::DailyDriftWrapper;
use crate::sql::types::DailyDriftUpsert;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use warden_types::record::{DailyDrift, ModelKey};

#[async_trait]
pub trait DriftSqlLogic {
    /// Write the full recomputed psi payload for (key, day).
    async fn upsert_daily_drift(
        pool: &Pool<Postgres>,
        record: &DailyDriftUpsert,
    ) -> Result<DailyDrift, SqlError> {
        let query = Queries::UpsertDailyDrift.get_query();

        let row: DailyDriftWrapper = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&record.key.project_id)
            .bind(&record.key.model_id)
            .bind(&record.key.endpoint)
            .bind(record.day)
            .bind(serde_json::to_value(&record.psi)?)
            .bind(&record.max_psi_feature)
            .bind(record.max_psi)
            .fetch_one(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(row.0)
    }

    async fn get_daily_drift(
        pool: &Pool<Postgres>,
        key: &ModelKey,
        day: NaiveDate,
    ) -> Result<Option<DailyDrift>, SqlError> {
        let query = Queries::GetDailyDrift.get_query();

        let row: Option<DailyDriftWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&key.project_id)
            .bind(&key.model_id)
            .bind(&key.endpoint)
            .bind(day)
            .fetch_optional(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(row.map(|wrapper| wrapper.0))
    }
}
