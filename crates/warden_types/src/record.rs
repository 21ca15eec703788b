use crate::feature::FeatureType;
use crate::severity::Severity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One prediction event as stored. Events are append-only; all derived
/// views (metrics, baselines, drift) are recomputed from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
    pub latency_ms: Option<i64>,
    pub y_pred: Option<i64>,
    pub y_proba: Option<f64>,
    pub features: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Distinct (project, model, endpoint) coordinate partitioning events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelKey {
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.project_id, self.model_id, self.endpoint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std: f64,
}

/// Per-day aggregate snapshot for one key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMetric {
    pub id: i64,
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub day: NaiveDate,
    pub n_events: i64,
    pub latency_p50_ms: Option<f64>,
    pub latency_p95_ms: Option<f64>,
    pub y_pred_rate: Option<f64>,
    pub y_proba_mean: Option<f64>,
    pub feature_stats: BTreeMap<String, FeatureStats>,
    pub created_at: DateTime<Utc>,
}

/// Per-feature PSI outcome stored inside a DailyDrift row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePsi {
    pub psi: f64,
    pub n: usize,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Per-day drift snapshot: feature name mapped to its PSI outcome, plus the
/// worst offender denormalized for queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyDrift {
    pub id: i64,
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub day: NaiveDate,
    pub psi: BTreeMap<String, FeaturePsi>,
    pub max_psi_feature: Option<String>,
    pub max_psi: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A raised alert. At most one row exists per (key, day, rule); the unique
/// constraint in storage is the deduplication boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub day: NaiveDate,
    pub rule: String,
    pub severity: Severity,
    pub value: f64,
    pub threshold: f64,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// One billing line for a (project, day). The synthetic service "TOTAL"
/// carries the per-day sum used by spike checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCost {
    pub id: i64,
    pub project_id: String,
    pub day: NaiveDate,
    pub service: String,
    pub amount: f64,
    pub unit: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}
