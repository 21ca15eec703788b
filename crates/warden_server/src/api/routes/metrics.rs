use crate::api::error::ServerError;
use crate::api::state::AppState;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use warden_metrics::compute_daily_metrics;
use warden_sql::sql::traits::MetricSqlLogic;
use warden_sql::PostgresClient;
use warden_types::contracts::{DayKeyRequest, MetricsComputeRequest};
use warden_types::record::DailyMetric;

pub async fn metrics_compute(
    State(data): State<Arc<AppState>>,
    Query(params): Query<MetricsComputeRequest>,
) -> Result<Json<DailyMetric>, ServerError> {
    let row = compute_daily_metrics(&data.db_pool, &params).await?;
    Ok(Json(row))
}

/// Stored snapshot or null.
pub async fn metrics_daily(
    State(data): State<Arc<AppState>>,
    Query(params): Query<DayKeyRequest>,
) -> Result<Json<Option<DailyMetric>>, ServerError> {
    let row =
        PostgresClient::get_daily_metric(&data.db_pool, &params.key(), params.day).await?;
    Ok(Json(row))
}

pub fn get_metric_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{prefix}/metrics/compute"), post(metrics_compute))
        .route(&format!("{prefix}/metrics/daily"), get(metrics_daily))
}
