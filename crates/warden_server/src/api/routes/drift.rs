use crate::api::error::ServerError;
use crate::api::state::AppState;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use warden_drift::{
    capture_feature_baseline, compute_drift_all, compute_feature_drift, process_drift_alert,
};
use warden_sql::sql::traits::DriftSqlLogic;
use warden_sql::PostgresClient;
use warden_types::contracts::{
    BaselineCaptureRequest, BaselineCaptureResult, DayKeyRequest, DriftComputeAllRequest,
    DriftComputeAllResult, DriftComputeRequest, FeatureDriftResult,
};
use warden_types::record::DailyDrift;

pub async fn baseline_capture(
    State(data): State<Arc<AppState>>,
    Query(params): Query<BaselineCaptureRequest>,
) -> Result<Json<BaselineCaptureResult>, ServerError> {
    let result = capture_feature_baseline(&data.db_pool, &params).await?;
    Ok(Json(result))
}

pub async fn drift_compute(
    State(data): State<Arc<AppState>>,
    Query(params): Query<DriftComputeRequest>,
) -> Result<Json<FeatureDriftResult>, ServerError> {
    let result = compute_feature_drift(&data.db_pool, &params).await?;
    Ok(Json(result))
}

/// All-feature drift for one day, optionally raising a deduplicated alert
/// and notifying Slack when the worst PSI reaches the threshold.
pub async fn drift_compute_all(
    State(data): State<Arc<AppState>>,
    Query(params): Query<DriftComputeAllRequest>,
) -> Result<Json<DriftComputeAllResult>, ServerError> {
    let mut result = compute_drift_all(&data.db_pool, &params).await?;

    if params.alert {
        process_drift_alert(&data.db_pool, &data.notifier, &mut result, params.threshold)
            .await?;
    }

    Ok(Json(result))
}

/// Stored drift row or null.
pub async fn drift_daily(
    State(data): State<Arc<AppState>>,
    Query(params): Query<DayKeyRequest>,
) -> Result<Json<Option<DailyDrift>>, ServerError> {
    let row = PostgresClient::get_daily_drift(&data.db_pool, &params.key(), params.day).await?;
    Ok(Json(row))
}

pub fn get_drift_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{prefix}/drift/baseline/capture"),
            post(baseline_capture),
        )
        .route(&format!("{prefix}/drift/compute"), post(drift_compute))
        .route(
            &format!("{prefix}/drift/compute_all"),
            post(drift_compute_all),
        )
        .route(&format!("{prefix}/drift/daily"), get(drift_daily))
}
