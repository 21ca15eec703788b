use crate::api::error::ServerError;
use crate::api::state::AppState;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use warden_sql::sql::traits::AlertSqlLogic;
use warden_sql::PostgresClient;
use warden_types::contracts::AlertListRequest;
use warden_types::record::Alert;

pub async fn list_alerts(
    State(data): State<Arc<AppState>>,
    Query(params): Query<AlertListRequest>,
) -> Result<Json<Vec<Alert>>, ServerError> {
    let alerts = PostgresClient::get_alerts(&data.db_pool, &params).await?;
    Ok(Json(alerts))
}

/// Send a fixed test message to the configured webhook. Failures (including
/// a disabled webhook) surface as a 400.
pub async fn slack_test(State(data): State<Arc<AppState>>) -> Result<Json<Value>, ServerError> {
    data.notifier.send_test_message().await?;
    Ok(Json(
        json!({"ok": true, "slack_enabled": data.config.slack_settings.enabled}),
    ))
}

pub fn get_alert_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{prefix}/alerts"), get(list_alerts))
        .route(&format!("{prefix}/alerts/slack/test"), post(slack_test))
}
