use crate::sql::error::SqlError;
use crate::sql::query::Queries;
use crate::sql::schema::{EventWrapper, ModelKeyWrapper};
use crate::sql::types::EventInsert;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::{Pool, Postgres};
use warden_types::record::{Event, ModelKey};

#[async_trait]
pub trait EventSqlLogic {
    /// Insert a batch of events in one transaction. Commit is the last
    /// step, so a cancelled request persists nothing.
    async fn insert_events(
        pool: &Pool<Postgres>,
        events: &[EventInsert],
    ) -> Result<u64, SqlError> {
        let query = Queries::InsertEvent.get_query();
        let mut tx = pool.begin().await.map_err(SqlError::traced_query_error)?;

        for event in events {
            sqlx::query(sqlx::AssertSqlSafe(query.sql.as_str()))
                .bind(&event.project_id)
                .bind(&event.model_id)
                .bind(&event.endpoint)
                .bind(event.timestamp)
                .bind(event.latency_ms)
                .bind(event.y_pred)
                .bind(event.y_proba)
                .bind(Value::Object(event.features.clone()))
                .execute(&mut *tx)
                .await
                .map_err(SqlError::traced_query_error)?;
        }

        tx.commit().await.map_err(SqlError::traced_query_error)?;
        Ok(events.len() as u64)
    }

    /// Events for one key inside a half-open UTC window, ascending.
    async fn get_events_in_window(
        pool: &Pool<Postgres>,
        key: &ModelKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, SqlError> {
        let query = Queries::GetEventsWindow.get_query();

        let events: Vec<EventWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&key.project_id)
            .bind(&key.model_id)
            .bind(&key.endpoint)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(events.into_iter().map(|wrapper| wrapper.0).collect())
    }

    /// Most recent n events for one key, newest first.
    async fn get_recent_events(
        pool: &Pool<Postgres>,
        key: &ModelKey,
        n: i64,
    ) -> Result<Vec<Event>, SqlError> {
        let query = Queries::GetRecentEvents.get_query();

        let events: Vec<EventWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&key.project_id)
            .bind(&key.model_id)
            .bind(&key.endpoint)
            .bind(n)
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(events.into_iter().map(|wrapper| wrapper.0).collect())
    }

    async fn get_distinct_model_keys(pool: &Pool<Postgres>) -> Result<Vec<ModelKey>, SqlError> {
        let query = Queries::GetDistinctModelKeys.get_query();

        let keys: Vec<ModelKeyWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(keys.into_iter().map(|wrapper| wrapper.0).collect())
    }

    async fn get_model_keys_for_project(
        pool: &Pool<Postgres>,
        project_id: &str,
    ) -> Result<Vec<ModelKey>, SqlError> {
        let query = Queries::GetDistinctModelKeysForProject.get_query();

        let keys: Vec<ModelKeyWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(project_id)
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(keys.into_iter().map(|wrapper| wrapper.0).collect())
    }

    /// UTC dates having at least one event for the key.
    async fn get_event_days(
        pool: &Pool<Postgres>,
        key: &ModelKey,
    ) -> Result<Vec<NaiveDate>, SqlError> {
        let query = Queries::GetDistinctEventDays.get_query();

        sqlx::query_scalar(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&key.project_id)
            .bind(&key.model_id)
            .bind(&key.endpoint)
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)
    }

    async fn get_distinct_projects(pool: &Pool<Postgres>) -> Result<Vec<String>, SqlError> {
        let query = Queries::GetDistinctProjects.get_query();

        sqlx::query_scalar(sqlx::AssertSqlSafe(query.sql.as_str()))
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)
    }
}
