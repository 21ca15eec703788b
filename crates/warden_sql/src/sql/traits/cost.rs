use crate::sql::error::SqlError;
use crate::sql::query::Queries;
use crate::sql::schema::DailyCostWrapper;
use crate::sql::types::CostRowInsert;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sqlx::{Pool, Postgres};
use warden_types::record::DailyCost;

#[async_trait]
pub trait CostSqlLogic {
    /// Store billing rows for (project, day). Overwrite deletes the
    /// existing slice first, in the same transaction.
    async fn replace_daily_costs(
        pool: &Pool<Postgres>,
        project_id: &str,
        day: NaiveDate,
        rows: &[CostRowInsert],
        overwrite: bool,
    ) -> Result<u64, SqlError> {
        let mut tx = pool.begin().await.map_err(SqlError::traced_query_error)?;

        if overwrite {
            let delete = Queries::DeleteDailyCosts.get_query();
            sqlx::query(sqlx::AssertSqlSafe(delete.sql.as_str()))
                .bind(project_id)
                .bind(day)
                .execute(&mut *tx)
                .await
                .map_err(SqlError::traced_query_error)?;
        }

        let insert = Queries::InsertDailyCost.get_query();
        for row in rows {
            sqlx::query(sqlx::AssertSqlSafe(insert.sql.as_str()))
                .bind(project_id)
                .bind(day)
                .bind(&row.service)
                .bind(row.amount)
                .bind(&row.unit)
                .bind(&row.payload)
                .execute(&mut *tx)
                .await
                .map_err(SqlError::traced_query_error)?;
        }

        tx.commit().await.map_err(SqlError::traced_query_error)?;
        Ok(rows.len() as u64)
    }

    async fn get_daily_costs(
        pool: &Pool<Postgres>,
        project_id: &str,
        day: NaiveDate,
    ) -> Result<Vec<DailyCost>, SqlError> {
        let query = Queries::GetDailyCosts.get_query();

        let rows: Vec<DailyCostWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(project_id)
            .bind(day)
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(rows.into_iter().map(|wrapper| wrapper.0).collect())
    }

    async fn get_total_cost(
        pool: &Pool<Postgres>,
        project_id: &str,
        day: NaiveDate,
    ) -> Result<Option<DailyCost>, SqlError> {
        let query = Queries::GetTotalCost.get_query();

        let row: Option<DailyCostWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(project_id)
            .bind(day)
            .fetch_optional(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(row.map(|wrapper| wrapper.0))
    }

    /// Mean TOTAL over the lookback window ending the day before `day`.
    async fn trailing_average_total(
        pool: &Pool<Postgres>,
        project_id: &str,
        day: NaiveDate,
        lookback_days: i64,
    ) -> Result<Option<f64>, SqlError> {
        let query = Queries::GetTrailingAvgTotal.get_query();
        let start = day - Duration::days(lookback_days);

        sqlx::query_scalar(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(project_id)
            .bind(start)
            .bind(day)
            .fetch_one(pool)
            .await
            .map_err(SqlError::traced_query_error)
    }
}
