use crate::error::DriftError;
use serde_json::json;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use warden_dispatch::{DispatchError, SlackNotifier};
use warden_sql::sql::traits::AlertSqlLogic;
use warden_sql::sql::types::AlertInsert;
use warden_sql::PostgresClient;
use warden_types::contracts::DriftComputeAllResult;
use warden_types::record::ModelKey;
use warden_types::severity::Severity;

pub const DRIFT_RULE: &str = "drift";

/// Raise a deduplicated drift alert for a compute-all result when its worst
/// PSI reaches the threshold, and notify Slack best-effort. Notification
/// failure never fails the computation; it is recorded on the result.
pub async fn process_drift_alert(
    pool: &Pool<Postgres>,
    notifier: &SlackNotifier,
    result: &mut DriftComputeAllResult,
    threshold: f64,
) -> Result<(), DriftError> {
    let max_psi = result.max_psi.unwrap_or(0.0);
    if max_psi < threshold {
        result.alert_created = Some(false);
        return Ok(());
    }

    let key = ModelKey {
        project_id: result.project_id.clone(),
        model_id: result.model_id.clone(),
        endpoint: result.endpoint.clone(),
    };
    let severity = Severity::from_psi(max_psi);
    let feature = result
        .max_psi_feature
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    let record = AlertInsert {
        key: key.clone(),
        day: result.day,
        rule: DRIFT_RULE.to_string(),
        severity,
        value: max_psi,
        threshold,
        payload: json!({
            "day": result.day,
            "max_psi_feature": feature,
            "max_psi": max_psi,
            "threshold": threshold,
            "psi": result.psi,
            "skipped_low_sample": result.skipped_low_sample,
            "missing_baseline": result.missing_baseline,
        }),
    };

    let inserted = PostgresClient::insert_alert_once(pool, &record).await?;
    match inserted {
        Some(alert) => {
            info!(key = %key, day = %result.day, max_psi, "Created drift alert");
            result.alert_created = Some(true);
            result.alert_id = Some(alert.id);

            match notifier
                .send_drift_alert(&key, result.day, &feature, max_psi, threshold, severity)
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
        None => {
            // another writer won the (key, day, rule) race
            result.alert_created = Some(false);
        }
    }

    Ok(())
}
