use crate::sql::error::SqlError;
use crate::sql::query::Queries;
use crate::sql::schema::FeatureBaselineWrapper;
use crate::sql::types::FeatureBaselineInsert;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use warden_types::baseline::FeatureBaseline;
use warden_types::record::ModelKey;

#[async_trait]
pub trait BaselineSqlLogic {
    /// Persist a captured baseline. With overwrite the existing row for the
    /// same (key, feature) is deleted first, inside the same transaction.
    async fn insert_feature_baseline(
        pool: &Pool<Postgres>,
        record: &FeatureBaselineInsert,
        overwrite: bool,
    ) -> Result<FeatureBaseline, SqlError> {
        let mut tx = pool.begin().await.map_err(SqlError::traced_query_error)?;

        if overwrite {
            let delete = Queries::DeleteFeatureBaseline.get_query();
            sqlx::query(sqlx::AssertSqlSafe(delete.sql.as_str()))
                .bind(&record.key.project_id)
                .bind(&record.key.model_id)
                .bind(&record.key.endpoint)
                .bind(&record.feature)
                .execute(&mut *tx)
                .await
                .map_err(SqlError::traced_query_error)?;
        }

        let insert = Queries::InsertFeatureBaseline.get_query();
        let row: FeatureBaselineWrapper = sqlx::query_as(sqlx::AssertSqlSafe(insert.sql.as_str()))
            .bind(&record.key.project_id)
            .bind(&record.key.model_id)
            .bind(&record.key.endpoint)
            .bind(&record.feature)
            .bind(record.feature_type.to_string())
            .bind(record.n_baseline)
            .bind(serde_json::to_value(&record.definition)?)
            .bind(serde_json::to_value(&record.baseline_probs)?)
            .fetch_one(&mut *tx)
            .await
            .map_err(SqlError::traced_query_error)?;

        tx.commit().await.map_err(SqlError::traced_query_error)?;
        Ok(row.0)
    }

    async fn get_feature_baseline(
        pool: &Pool<Postgres>,
        key: &ModelKey,
        feature: &str,
    ) -> Result<Option<FeatureBaseline>, SqlError> {
        let query = Queries::GetFeatureBaseline.get_query();

        let row: Option<FeatureBaselineWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&key.project_id)
            .bind(&key.model_id)
            .bind(&key.endpoint)
            .bind(feature)
            .fetch_optional(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(row.map(|wrapper| wrapper.0))
    }

    /// All baselines for one key, ordered by feature name.
    async fn get_feature_baselines(
        pool: &Pool<Postgres>,
        key: &ModelKey,
    ) -> Result<Vec<FeatureBaseline>, SqlError> {
        let query = Queries::GetFeatureBaselines.get_query();

        let rows: Vec<FeatureBaselineWrapper> = sqlx::query_as(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&key.project_id)
            .bind(&key.model_id)
            .bind(&key.endpoint)
            .fetch_all(pool)
            .await
            .map_err(SqlError::traced_query_error)?;

        Ok(rows.into_iter().map(|wrapper| wrapper.0).collect())
    }

    async fn count_feature_baselines(
        pool: &Pool<Postgres>,
        key: &ModelKey,
    ) -> Result<i64, SqlError> {
        let query = Queries::CountFeatureBaselines.get_query();

        sqlx::query_scalar(sqlx::AssertSqlSafe(query.sql.as_str()))
            .bind(&key.project_id)
            .bind(&key.model_id)
            .bind(&key.endpoint)
            .fetch_one(pool)
            .await
            .map_err(SqlError::traced_query_error)
    }
}
