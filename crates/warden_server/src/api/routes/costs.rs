use crate::api::error::ServerError;
use crate::api::state::AppState;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;
use warden_costs::{
    evaluate_spike, pull_and_store_daily_costs, BillingClient, COST_SPIKE_RULE,
};
use warden_dispatch::DispatchError;
use warden_sql::sql::traits::{AlertSqlLogic, CostSqlLogic};
use warden_sql::sql::types::AlertInsert;
use warden_sql::PostgresClient;
use warden_types::contracts::{
    CostDailyRequest, CostPullRequest, CostPullResult, CostSpikeRequest, CostSpikeResult,
};
use warden_types::record::{DailyCost, ModelKey};

/// Synthetic key parts for billing-scoped alerts; costs have no model or
/// endpoint coordinate.
const BILLING_KEY_PART: &str = "__billing__";

pub async fn pull_costs(
    State(data): State<Arc<AppState>>,
    Query(params): Query<CostPullRequest>,
) -> Result<Json<CostPullResult>, ServerError> {
    let client = BillingClient::new(&data.config.cost_settings)?;
    let result = pull_and_store_daily_costs(&data.db_pool, &client, &params).await?;
    Ok(Json(result))
}

pub async fn daily_costs(
    State(data): State<Arc<AppState>>,
    Query(params): Query<CostDailyRequest>,
) -> Result<Json<Vec<DailyCost>>, ServerError> {
    let rows =
        PostgresClient::get_daily_costs(&data.db_pool, &params.project_id, params.day).await?;
    Ok(Json(rows))
}

/// Compare the day's TOTAL against the trailing average; on a spike,
/// optionally raise a deduplicated alert and notify Slack best-effort.
pub async fn check_cost_spike(
    State(data): State<Arc<AppState>>,
    Query(params): Query<CostSpikeRequest>,
) -> Result<Json<CostSpikeResult>, ServerError> {
    let evaluation = evaluate_spike(&data.db_pool, &params).await?;

    let mut result = CostSpikeResult {
        project_id: params.project_id.clone(),
        day: params.day,
        total: evaluation.total,
        unit: evaluation.unit.clone(),
        trailing_avg: evaluation.trailing_avg,
        computed_threshold: evaluation.computed_threshold,
        is_spike: evaluation.is_spike,
        severity: evaluation.severity,
        alert_created: None,
        alert_id: None,
        slack_alert_sent: None,
        slack_note: None,
    };

    if !params.alert {
        return Ok(Json(result));
    }
    if !evaluation.is_spike {
        result.alert_created = Some(false);
        result.slack_note = Some("No alert: below threshold.".to_string());
        return Ok(Json(result));
    }

    let record = AlertInsert {
        key: ModelKey {
            project_id: params.project_id.clone(),
            model_id: BILLING_KEY_PART.to_string(),
            endpoint: BILLING_KEY_PART.to_string(),
        },
        day: params.day,
        rule: COST_SPIKE_RULE.to_string(),
        severity: evaluation.severity,
        value: evaluation.total,
        threshold: evaluation.computed_threshold,
        payload: json!({
            "project_id": params.project_id,
            "day": params.day,
            "total": evaluation.total,
            "trailing_avg": evaluation.trailing_avg,
            "pct": params.pct,
            "min_abs": params.min_abs,
            "lookback_days": params.lookback_days,
            "computed_threshold": evaluation.computed_threshold,
        }),
    };
    let inserted = PostgresClient::insert_alert_once(&data.db_pool, &record).await?;
    result.alert_created = Some(inserted.is_some());
    result.alert_id = inserted.map(|alert| alert.id);

    if params.slack {
        match data
            .notifier
            .send_cost_alert(
                &params.project_id,
                params.day,
                evaluation.total,
                evaluation.trailing_avg,
                evaluation.computed_threshold,
                params.pct,
            )
            .await
        {
            Ok(()) => {
                result.slack_alert_sent = Some(true);
                result.slack_note = Some("Slack message sent.".to_string());
            }
            Err(DispatchError::Disabled) => {
                result.slack_alert_sent = Some(false);
                result.slack_note = Some("Slack disabled; no message sent.".to_string());
            }
            Err(e) => {
                warn!("Slack send failed: {e}");
                result.slack_alert_sent = Some(false);
                result.slack_note = Some(format!("Slack send failed: {e}"));
            }
        }
    }

    Ok(Json(result))
}

pub fn get_cost_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{prefix}/costs/pull"), post(pull_costs))
        .route(&format!("{prefix}/costs/daily"), get(daily_costs))
        .route(&format!("{prefix}/costs/check_spike"), post(check_cost_spike))
}
