use crate::feature::FeatureType;
use crate::record::{FeaturePsi, ModelKey};
use crate::severity::{Severity, PSI_ALERT_THRESHOLD};
use crate::util::deserialize_flexible_timestamp;
use crate::{DEFAULT_BASELINE_N, DEFAULT_MIN_SAMPLES, DEFAULT_N_BINS, DEFAULT_TOP_K_CATEGORIES};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn default_endpoint() -> String {
    "predict".to_string()
}

fn default_tz() -> String {
    "UTC".to_string()
}

fn default_true() -> bool {
    true
}

fn default_n_bins() -> usize {
    DEFAULT_N_BINS
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K_CATEGORIES
}

fn default_min_samples() -> usize {
    DEFAULT_MIN_SAMPLES
}

fn default_alert_threshold() -> f64 {
    PSI_ALERT_THRESHOLD
}

fn default_alert_limit() -> i64 {
    50
}

fn default_lookback_days() -> i64 {
    7
}

fn default_spike_pct() -> f64 {
    0.50
}

fn default_spike_min_abs() -> f64 {
    5.0
}

/// Ingestion body: one prediction event as sent by a producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventIn {
    pub project_id: String,
    pub model_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default, deserialize_with = "deserialize_flexible_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub latency_ms: Option<i64>,
    pub y_pred: Option<i64>,
    pub y_proba: Option<f64>,
    pub features: Map<String, Value>,
}

impl EventIn {
    /// Timestamp to persist: the caller's instant, or now.
    pub fn normalized_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp.unwrap_or(now)
    }
}

/// POST /events accepts a single event or a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngestBody {
    Single(Box<EventIn>),
    Batch(Vec<EventIn>),
}

impl IngestBody {
    pub fn into_events(self) -> Vec<EventIn> {
        match self {
            IngestBody::Single(event) => vec![*event],
            IngestBody::Batch(events) => events,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub inserted: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverModelsRequest {
    pub project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverDaysRequest {
    pub project_id: String,
    pub model_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsComputeRequest {
    pub project_id: String,
    pub model_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub day: NaiveDate,
    #[serde(default = "default_tz")]
    pub tz: String,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl MetricsComputeRequest {
    pub fn key(&self) -> ModelKey {
        ModelKey {
            project_id: self.project_id.clone(),
            model_id: self.model_id.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

/// Key + day lookup used by the stored-row read endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DayKeyRequest {
    pub project_id: String,
    pub model_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub day: NaiveDate,
}

impl DayKeyRequest {
    pub fn key(&self) -> ModelKey {
        ModelKey {
            project_id: self.project_id.clone(),
            model_id: self.model_id.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaselineCaptureRequest {
    pub project_id: String,
    pub model_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub feature: String,
    #[serde(default, deserialize_with = "deserialize_flexible_timestamp")]
    pub start_ts: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_flexible_timestamp")]
    pub end_ts: Option<DateTime<Utc>>,
    pub start_day: Option<NaiveDate>,
    pub end_day: Option<NaiveDate>,
    pub n: Option<i64>,
    #[serde(default = "default_tz")]
    pub tz: String,
    #[serde(default = "default_n_bins")]
    pub n_bins: usize,
    #[serde(default = "default_top_k")]
    pub top_k_categories: usize,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl BaselineCaptureRequest {
    pub fn key(&self) -> ModelKey {
        ModelKey {
            project_id: self.project_id.clone(),
            model_id: self.model_id.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    pub fn fallback_n(&self) -> i64 {
        self.n.unwrap_or(DEFAULT_BASELINE_N)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineCaptureResult {
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub feature: String,
    pub feature_type: FeatureType,
    pub n_baseline: usize,
    pub definition: crate::baseline::BaselineDefinition,
    pub baseline_probs: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriftComputeRequest {
    pub project_id: String,
    pub model_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub day: NaiveDate,
    pub feature: String,
    #[serde(default = "default_tz")]
    pub tz: String,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

impl DriftComputeRequest {
    pub fn key(&self) -> ModelKey {
        ModelKey {
            project_id: self.project_id.clone(),
            model_id: self.model_id.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDriftResult {
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub day: NaiveDate,
    pub feature: String,
    pub psi: f64,
    pub n: usize,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub severity: Severity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriftComputeAllRequest {
    pub project_id: String,
    pub model_id: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub day: NaiveDate,
    #[serde(default = "default_tz")]
    pub tz: String,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_true")]
    pub overwrite: bool,
    #[serde(default)]
    pub alert: bool,
    #[serde(default = "default_alert_threshold")]
    pub threshold: f64,
}

impl DriftComputeAllRequest {
    pub fn key(&self) -> ModelKey {
        ModelKey {
            project_id: self.project_id.clone(),
            model_id: self.model_id.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftComputeAllResult {
    pub project_id: String,
    pub model_id: String,
    pub endpoint: String,
    pub day: NaiveDate,
    pub psi: BTreeMap<String, FeaturePsi>,
    pub missing_baseline: Vec<String>,
    pub skipped_low_sample: BTreeMap<String, usize>,
    pub max_psi_feature: Option<String>,
    pub max_psi: Option<f64>,
    pub max_severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_alert_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertListRequest {
    pub project_id: Option<String>,
    pub model_id: Option<String>,
    pub endpoint: Option<String>,
    pub rule: Option<String>,
    #[serde(default = "default_alert_limit")]
    pub limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostPullRequest {
    pub project_id: String,
    pub day: NaiveDate,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostPullResult {
    pub project_id: String,
    pub day: NaiveDate,
    pub rows: usize,
    pub total: Option<f64>,
    pub unit: String,
    pub stored: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostDailyRequest {
    pub project_id: String,
    pub day: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostSpikeRequest {
    pub project_id: String,
    pub day: NaiveDate,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    #[serde(default = "default_spike_pct")]
    pub pct: f64,
    #[serde(default = "default_spike_min_abs")]
    pub min_abs: f64,
    #[serde(default = "default_true")]
    pub alert: bool,
    #[serde(default = "default_true")]
    pub slack: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSpikeResult {
    pub project_id: String,
    pub day: NaiveDate,
    pub total: f64,
    pub unit: String,
    pub trailing_avg: f64,
    pub computed_threshold: f64,
    pub is_spike: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_alert_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ingest_body_accepts_single_and_batch() {
        let single: IngestBody = serde_json::from_value(json!({
            "project_id": "demo",
            "model_id": "churn",
            "features": {"age": 31}
        }))
        .unwrap();
        assert_eq!(single.into_events().len(), 1);

        let batch: IngestBody = serde_json::from_value(json!([
            {"project_id": "demo", "model_id": "churn", "features": {"age": 31}},
            {"project_id": "demo", "model_id": "churn", "features": {"age": 44}}
        ]))
        .unwrap();
        assert_eq!(batch.into_events().len(), 2);
    }

    #[test]
    fn test_event_in_defaults() {
        let event: EventIn = serde_json::from_value(json!({
            "project_id": "demo",
            "model_id": "churn",
            "features": {"age": 31}
        }))
        .unwrap();
        assert_eq!(event.endpoint, "predict");
        let now = Utc::now();
        assert_eq!(event.normalized_timestamp(now), now);
    }

    #[test]
    fn test_event_in_accepts_naive_timestamp() {
        let event: EventIn = serde_json::from_value(json!({
            "project_id": "demo",
            "model_id": "churn",
            "timestamp": "2024-03-10T07:30:00",
            "features": {"age": 31}
        }))
        .unwrap();
        assert_eq!(
            event.timestamp.unwrap().to_rfc3339(),
            "2024-03-10T07:30:00+00:00"
        );
    }

    #[test]
    fn test_compute_all_request_defaults() {
        let request: DriftComputeAllRequest = serde_json::from_value(json!({
            "project_id": "demo",
            "model_id": "churn",
            "day": "2024-03-10"
        }))
        .unwrap();
        assert_eq!(request.endpoint, "predict");
        assert_eq!(request.tz, "UTC");
        assert_eq!(request.min_samples, 10);
        assert!(request.overwrite);
        assert!(!request.alert);
        assert_eq!(request.threshold, 0.25);
    }
}
