use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use warden_types::baseline::BaselineDefinition;
use warden_types::feature::FeatureType;
use warden_types::record::{FeaturePsi, FeatureStats, ModelKey};
use warden_types::severity::Severity;

/// Event payload as written by the ingestion path.
#[derive(Debug, Clone)]
pub struct EventInsert {
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
    pub latency_ms: Option<i64>,
    pub y_pred: Option<i64>,
    pub y_proba: Option<f64>,
    pub features: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct FeatureBaselineInsert {
    pub key: ModelKey,
    pub feature: String,
    pub feature_type: FeatureType,
    pub n_baseline: i64,
    pub definition: BaselineDefinition,
    pub baseline_probs: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct DailyMetricInsert {
    pub key: ModelKey,
    pub day: NaiveDate,
    pub n_events: i64,
    pub latency_p50_ms: Option<f64>,
    pub latency_p95_ms: Option<f64>,
    pub y_pred_rate: Option<f64>,
    pub y_proba_mean: Option<f64>,
    pub feature_stats: BTreeMap<String, FeatureStats>,
}

/// Full recomputed daily-drift payload. Written with ON CONFLICT DO UPDATE
/// so concurrent writers cannot lose updates mid read-modify-write.
#[derive(Debug, Clone)]
pub struct DailyDriftUpsert {
    pub key: ModelKey,
    pub day: NaiveDate,
    pub psi: BTreeMap<String, FeaturePsi>,
    pub max_psi_feature: Option<String>,
    pub max_psi: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AlertInsert {
    pub key: ModelKey,
    pub day: NaiveDate,
    pub rule: String,
    pub severity: Severity,
    pub value: f64,
    pub threshold: f64,
    pub payload: Value,
}

#[derive(Debug, Clone)]
pub struct CostRowInsert {
    pub service: String,
    pub amount: f64,
    pub unit: String,
    pub payload: Value,
}
