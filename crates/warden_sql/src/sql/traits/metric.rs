use crate::sql::error::SqlError;
use crate::sql::query::Queries;
use crate::sql::schema::DailyMetricWrapper;
use crate::sql::types::DailyMetricInsert;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use warden_types::record::{DailyMetric, ModelKey};

#[async_trait]
pub trait MetricSqlLogic {
    /// Store a daily metric snapshot. Overwrite replaces an existing row
    /// for the same (key, day); otherwise a duplicate surfaces the unique
    /// violation.
    async fn upsert_daily_metric(
        pool: &Pool<Postgres>,
        record: &DailyMetricInsert,
        overwrite: bool,
    ) -> Result<DailyMetric, SqlError> {
        let query = if overwrite {
            Queries::UpsertDailyMetric.get_query()
        } else {
            Queries::InsertDailyMetric.get_query()
        };

        let row: DailyMetricWrapper = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&record.key.project_id)
            .bind(&record.key.model_id)
            .bind(&record.key.endpoint)
            .bind(record.day)
            .bind(record.n_events)
            .bind(record.latency_p50_ms)
            .bind(record.latency_p95_ms)
            .bind(record.y_pred_rate)
            .bind(record.y_proba_mean)
            .bind(serde_json::to_value(&record.feature_stats)?)
            .fetch_one(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(row.0)
    }

    async fn get_daily_metric(
        pool: &Pool<Postgres>,
        key: &ModelKey,
        day: NaiveDate,
    ) -> Result<Option<DailyMetric>, SqlError> {
        let query = Queries::GetDailyMetric.get_query();

        let row: Option<DailyMetricWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
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
