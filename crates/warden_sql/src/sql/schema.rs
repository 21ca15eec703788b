use serde_json::Value;
use sqlx::{postgres::PgRow, Error, FromRow, Row};
use std::collections::BTreeMap;
use warden_types::baseline::{BaselineDefinition, FeatureBaseline};
use warden_types::feature::FeatureType;
use warden_types::record::{
    Alert, DailyCost, DailyDrift, DailyMetric, Event, FeaturePsi, FeatureStats, ModelKey,
};
use warden_types::severity::Severity;

fn decode_json<T: serde::de::DeserializeOwned>(value: Value, column: &str) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub struct EventWrapper(pub Event);

impl<'r> FromRow<'r, PgRow> for EventWrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, Error> {
        let features: Value = row.try_get("features")?;
        let features = match features {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        Ok(EventWrapper(Event {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            model_id: row.try_get("model_id")?,
            endpoint: row.try_get("endpoint")?,
            timestamp: row.try_get("timestamp")?,
            latency_ms: row.try_get("latency_ms")?,
            y_pred: row.try_get("y_pred")?,
            y_proba: row.try_get("y_proba")?,
            features,
            created_at: row.try_get("created_at")?,
        }))
    }
}

pub struct ModelKeyWrapper(pub ModelKey);

impl<'r> FromRow<'r, PgRow> for ModelKeyWrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, Error> {
        Ok(ModelKeyWrapper(ModelKey {
            project_id: row.try_get("project_id")?,
            model_id: row.try_get("model_id")?,
            endpoint: row.try_get("endpoint")?,
        }))
    }
}

pub struct FeatureBaselineWrapper(pub FeatureBaseline);

impl<'r> FromRow<'r, PgRow> for FeatureBaselineWrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, Error> {
        let feature_type: String = row.try_get("feature_type")?;
        let feature_type: FeatureType = feature_type.parse().map_err(|e: String| {
            Error::Decode(e.into())
        })?;

        let definition: BaselineDefinition =
            decode_json(row.try_get("definition")?, "definition")?;
        let baseline_probs: Vec<f64> =
            decode_json(row.try_get("baseline_probs")?, "baseline_probs")?;

        Ok(FeatureBaselineWrapper(FeatureBaseline {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            model_id: row.try_get("model_id")?,
            endpoint: row.try_get("endpoint")?,
            feature: row.try_get("feature")?,
            feature_type,
            n_baseline: row.try_get("n_baseline")?,
            definition,
            baseline_probs,
            created_at: row.try_get("created_at")?,
        }))
    }
}

pub struct DailyMetricWrapper(pub DailyMetric);

impl<'r> FromRow<'r, PgRow> for DailyMetricWrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, Error> {
        let feature_stats: BTreeMap<String, FeatureStats> =
            decode_json(row.try_get("feature_stats")?, "feature_stats")?;

        Ok(DailyMetricWrapper(DailyMetric {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            model_id: row.try_get("model_id")?,
            endpoint: row.try_get("endpoint")?,
            day: row.try_get("day")?,
            n_events: row.try_get("n_events")?,
            latency_p50_ms: row.try_get("latency_p50_ms")?,
            latency_p95_ms: row.try_get("latency_p95_ms")?,
            y_pred_rate: row.try_get("y_pred_rate")?,
            y_proba_mean: row.try_get("y_proba_mean")?,
            feature_stats,
            created_at: row.try_get("created_at")?,
        }))
    }
}

pub struct DailyDriftWrapper(pub DailyDrift);

impl<'r> FromRow<'r, PgRow> for DailyDriftWrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, Error> {
        let psi: BTreeMap<String, FeaturePsi> = decode_json(row.try_get("psi")?, "psi")?;

        Ok(DailyDriftWrapper(DailyDrift {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            model_id: row.try_get("model_id")?,
            endpoint: row.try_get("endpoint")?,
            day: row.try_get("day")?,
            psi,
            max_psi_feature: row.try_get("max_psi_feature")?,
            max_psi: row.try_get("max_psi")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}

pub struct AlertWrapper(pub Alert);

impl<'r> FromRow<'r, PgRow> for AlertWrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, Error> {
        let severity: String = row.try_get("severity")?;
        let severity: Severity = severity.parse().map_err(|e: String| Error::Decode(e.into()))?;

        Ok(AlertWrapper(Alert {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            model_id: row.try_get("model_id")?,
            endpoint: row.try_get("endpoint")?,
            day: row.try_get("day")?,
            rule: row.try_get("rule")?,
            severity,
            value: row.try_get("value")?,
            threshold: row.try_get("threshold")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}

pub struct DailyCostWrapper(pub DailyCost);

impl<'r> FromRow<'r, PgRow> for DailyCostWrapper {
    fn from_row(row: &'r PgRow) -> Result<Self, Error> {
        Ok(DailyCostWrapper(DailyCost {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            day: row.try_get("day")?,
            service: row.try_get("service")?,
            amount: row.try_get("amount")?,
            unit: row.try_get("unit")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}
