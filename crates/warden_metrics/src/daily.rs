use crate::error::MetricError;
use crate::stats::{mean, percentile, std_dev};
use sqlx::{Pool, Postgres};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, instrument};
use warden_sql::sql::traits::{EventSqlLogic, MetricSqlLogic};
use warden_sql::sql::types::DailyMetricInsert;
use warden_sql::PostgresClient;
use warden_types::contracts::MetricsComputeRequest;
use warden_types::feature::FeatureValue;
use warden_types::record::{DailyMetric, Event, FeatureStats};
use warden_types::util::{day_window, parse_timezone};

fn feature_stats(events: &[Event]) -> BTreeMap<String, FeatureStats> {
    let mut per_feature: HashMap<&str, Vec<f64>> = HashMap::new();
    for event in events {
        for (name, value) in &event.features {
            if let Some(FeatureValue::Numeric(v)) = FeatureValue::from_json(value) {
                per_feature.entry(name.as_str()).or_default().push(v);
            }
        }
    }

    per_feature
        .into_iter()
        .filter_map(|(name, values)| {
            let mean = mean(&values)?;
            Some((
                name.to_string(),
                FeatureStats {
                    mean,
                    std: std_dev(&values, mean),
                },
            ))
        })
        .collect()
}

/// Aggregate one local day of events into a stored metric snapshot. An
/// empty day still writes a row with n_events = 0 and null aggregates.
#[instrument(skip(pool), fields(key = %request.key(), day = %request.day))]
pub async fn compute_daily_metrics(
    pool: &Pool<Postgres>,
    request: &MetricsComputeRequest,
) -> Result<DailyMetric, MetricError> {
    let key = request.key();
    let tz = parse_timezone(&request.tz)?;
    let (start, end) = day_window(request.day, tz)?;

    let events = PostgresClient::get_events_in_window(pool, &key, start, end).await?;

    let latencies: Vec<f64> = events
        .iter()
        .filter_map(|e| e.latency_ms.map(|v| v as f64))
        .collect();
    let y_preds: Vec<f64> = events
        .iter()
        .filter_map(|e| e.y_pred.map(|v| v as f64))
        .collect();
    let y_probas: Vec<f64> = events.iter().filter_map(|e| e.y_proba).collect();

    let record = DailyMetricInsert {
        key: key.clone(),
        day: request.day,
        n_events: events.len() as i64,
        latency_p50_ms: percentile(&latencies, 50.0),
        latency_p95_ms: percentile(&latencies, 95.0),
        y_pred_rate: mean(&y_preds),
        y_proba_mean: mean(&y_probas),
        feature_stats: feature_stats(&events),
    };

    let row = PostgresClient::upsert_daily_metric(pool, &record, request.overwrite).await?;

    info!(n_events = row.n_events, "Computed daily metrics");
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Utc;
    use serde_json::json;

    fn event(features: serde_json::Value) -> Event {
        Event {
            id: 0,
            project_id: "demo".to_string(),
            model_id: "churn".to_string(),
            endpoint: "predict".to_string(),
            timestamp: Utc::now(),
            latency_ms: None,
            y_pred: None,
            y_proba: None,
            features: features.as_object().unwrap().clone(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_feature_stats_numeric_only() {
        let events = vec![
            event(json!({"age": 20, "country": "CA", "flag": true})),
            event(json!({"age": 40, "country": "US"})),
        ];

        let stats = feature_stats(&events);
        assert_eq!(stats.len(), 1);
        let age = &stats["age"];
        assert_relative_eq!(age.mean, 30.0);
        assert_relative_eq!(age.std, 10.0);
    }

    #[test]
    fn test_feature_stats_empty() {
        assert!(feature_stats(&[]).is_empty());
    }
}
