use crate::sql::error::SqlError;
use crate::sql::query::Queries;
use crate::sql::schema::AlertWrapper;
use crate::sql::types::AlertInsert;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use warden_types::contracts::AlertListRequest;
use warden_types::record::Alert;

#[async_trait]
pub trait AlertSqlLogic {
    /// Optimistic insert against the (key, day, rule) unique constraint.
    /// The constraint is the sole deduplication boundary; losing the race
    /// returns None. Never SELECT-then-INSERT here.
    async fn insert_alert_once(
        pool: &Pool<Postgres>,
        record: &AlertInsert,
    ) -> Result<Option<Alert>, SqlError> {
        let query = Queries::InsertAlertOnce.get_query();

        let row: Option<AlertWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&record.key.project_id)
            .bind(&record.key.model_id)
            .bind(&record.key.endpoint)
            .bind(record.day)
            .bind(&record.rule)
            .bind(record.severity.to_string())
            .bind(record.value)
            .bind(record.threshold)
            .bind(&record.payload)
            .fetch_optional(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(row.map(|wrapper| wrapper.0))
    }

    /// Most-recent-first alert listing with optional key/rule filters.
    async fn get_alerts(
        pool: &Pool<Postgres>,
        params: &AlertListRequest,
    ) -> Result<Vec<Alert>, SqlError> {
        let query = Queries::GetAlerts.get_query();

        let rows: Vec<AlertWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&params.project_id)
            .bind(&params.model_id)
            .bind(&params.endpoint)
            .bind(&params.rule)
            .bind(params.limit)
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(rows.into_iter().map(|wrapper| wrapper.0).collect())
    }
}
