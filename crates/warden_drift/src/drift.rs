use crate::binning::{categorical_probs, histogram_probs};
use crate::error::DriftError;
use crate::psi::population_stability_index;
use crate::utils::{collect_day_samples, collect_feature_sample, max_psi_entry, DaySamples};
use sqlx::{Pool, Postgres};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};
use warden_sql::sql::traits::{BaselineSqlLogic, DriftSqlLogic, EventSqlLogic};
use warden_sql::sql::types::DailyDriftUpsert;
use warden_sql::PostgresClient;
use warden_types::baseline::{BaselineDefinition, FeatureBaseline};
use warden_types::contracts::{
    DriftComputeAllRequest, DriftComputeAllResult, DriftComputeRequest, FeatureDriftResult,
};
use warden_types::feature::FeatureType;
use warden_types::record::FeaturePsi;
use warden_types::severity::Severity;
use warden_types::util::{day_window, parse_timezone};

/// Actual-day probabilities under a stored definition: numeric samples are
/// histogrammed over the frozen edges, categorical samples are counted over
/// the frozen category list with the same other-bucket policy.
fn actual_probs(definition: &BaselineDefinition, samples: &DaySamples, feature: &str) -> Vec<f64> {
    static EMPTY_NUMERIC: Vec<f64> = Vec::new();
    static EMPTY_CATEGORICAL: Vec<String> = Vec::new();

    match definition {
        BaselineDefinition::Numeric { bin_edges } => {
            let values = samples.numeric.get(feature).unwrap_or(&EMPTY_NUMERIC);
            histogram_probs(values, bin_edges)
        }
        BaselineDefinition::Categorical { categories, .. } => {
            let values = samples
                .categorical
                .get(feature)
                .unwrap_or(&EMPTY_CATEGORICAL);
            categorical_probs(values, categories)
        }
    }
}

fn sample_size(definition: &BaselineDefinition, samples: &DaySamples, feature: &str) -> usize {
    match definition {
        BaselineDefinition::Numeric { .. } => {
            samples.numeric.get(feature).map_or(0, Vec::len)
        }
        BaselineDefinition::Categorical { .. } => {
            samples.categorical.get(feature).map_or(0, Vec::len)
        }
    }
}

fn feature_psi_entry(
    baseline: &FeatureBaseline,
    samples: &DaySamples,
    feature: &str,
) -> Result<FeaturePsi, DriftError> {
    let actual = actual_probs(&baseline.definition, samples, feature);
    let psi = population_stability_index(&baseline.baseline_probs, &actual)?;
    let categories = match &baseline.definition {
        BaselineDefinition::Categorical { categories, .. } => Some(categories.clone()),
        BaselineDefinition::Numeric { .. } => None,
    };

    Ok(FeaturePsi {
        psi,
        n: sample_size(&baseline.definition, samples, feature),
        feature_type: baseline.definition.feature_type(),
        severity: Severity::from_psi(psi),
        categories,
    })
}

/// Compute PSI for a single baselined feature over one local day and fold
/// the result into the day's drift row.
#[instrument(skip(pool), fields(feature = %request.feature, day = %request.day))]
pub async fn compute_feature_drift(
    pool: &Pool<Postgres>,
    request: &DriftComputeRequest,
) -> Result<FeatureDriftResult, DriftError> {
    let key = request.key();
    let tz = parse_timezone(&request.tz)?;

    let baseline = PostgresClient::get_feature_baseline(pool, &key, &request.feature)
        .await?
        .ok_or_else(|| DriftError::BaselineMissing(request.feature.clone()))?;

    let (start, end) = day_window(request.day, tz)?;
    let events = PostgresClient::get_events_in_window(pool, &key, start, end).await?;

    let sample = collect_feature_sample(&events, &request.feature);
    let got = match baseline.feature_type {
        FeatureType::Numeric => sample.numeric.len(),
        FeatureType::Categorical => sample.categorical.len(),
    };
    if got < request.min_samples {
        return Err(DriftError::NotEnoughData {
            feature: request.feature.clone(),
            got,
            required: request.min_samples,
        });
    }

    let samples = DaySamples {
        numeric: [(request.feature.clone(), sample.numeric)].into_iter().collect(),
        categorical: [(request.feature.clone(), sample.categorical)]
            .into_iter()
            .collect(),
        observed: Default::default(),
    };
    let entry = feature_psi_entry(&baseline, &samples, &request.feature)?;

    // fold into the stored map and recompute the worst offender over the
    // full set
    let mut psi_map = PostgresClient::get_daily_drift(pool, &key, request.day)
        .await?
        .map(|row| row.psi)
        .unwrap_or_default();
    psi_map.insert(request.feature.clone(), entry.clone());
    let (max_psi_feature, max_psi) = max_psi_entry(&psi_map);

    PostgresClient::upsert_daily_drift(
        pool,
        &DailyDriftUpsert {
            key: key.clone(),
            day: request.day,
            psi: psi_map,
            max_psi_feature,
            max_psi,
        },
    )
    .await?;

    debug!(psi = entry.psi, n = entry.n, "Computed feature drift");

    Ok(FeatureDriftResult {
        project_id: request.project_id.clone(),
        model_id: request.model_id.clone(),
        endpoint: request.endpoint.clone(),
        day: request.day,
        feature: request.feature.clone(),
        psi: entry.psi,
        n: entry.n,
        feature_type: entry.feature_type,
        severity: entry.severity,
    })
}

/// Compute PSI for every baselined feature over one local day.
///
/// Features observed without a baseline are reported, thin samples are
/// skipped without failing, and the stored row is either replaced or merged
/// depending on `overwrite`.
#[instrument(skip(pool), fields(key = %request.key(), day = %request.day))]
pub async fn compute_drift_all(
    pool: &Pool<Postgres>,
    request: &DriftComputeAllRequest,
) -> Result<DriftComputeAllResult, DriftError> {
    let key = request.key();
    let tz = parse_timezone(&request.tz)?;

    let baselines = PostgresClient::get_feature_baselines(pool, &key).await?;
    if baselines.is_empty() {
        return Err(DriftError::NoBaselines(key.to_string()));
    }

    let (start, end) = day_window(request.day, tz)?;
    let events = PostgresClient::get_events_in_window(pool, &key, start, end).await?;
    if events.is_empty() {
        return Err(DriftError::NoEvents(format!("{key} on {}", request.day)));
    }

    let samples = collect_day_samples(&events);

    let mut results: BTreeMap<String, FeaturePsi> = BTreeMap::new();
    let mut skipped_low_sample: BTreeMap<String, usize> = BTreeMap::new();

    for baseline in &baselines {
        let got = sample_size(&baseline.definition, &samples, &baseline.feature);
        if got < request.min_samples {
            skipped_low_sample.insert(baseline.feature.clone(), got);
            continue;
        }
        let entry = feature_psi_entry(baseline, &samples, &baseline.feature)?;
        results.insert(baseline.feature.clone(), entry);
    }

    let baselined: std::collections::BTreeSet<&str> =
        baselines.iter().map(|b| b.feature.as_str()).collect();
    let missing_baseline: Vec<String> = samples
        .observed
        .iter()
        .filter(|feature| !baselined.contains(feature.as_str()))
        .cloned()
        .collect();

    if results.is_empty() {
        return Err(DriftError::NothingComputed(format!(
            "skipped_low_sample={skipped_low_sample:?} missing_baseline={missing_baseline:?}"
        )));
    }

    // overwrite replaces the stored map; otherwise merge, keeping previous
    // entries for features skipped this run
    let mut psi_map = if request.overwrite {
        BTreeMap::new()
    } else {
        PostgresClient::get_daily_drift(pool, &key, request.day)
            .await?
            .map(|row| row.psi)
            .unwrap_or_default()
    };
    psi_map.extend(results.clone());
    let (max_psi_feature, max_psi) = max_psi_entry(&psi_map);

    PostgresClient::upsert_daily_drift(
        pool,
        &DailyDriftUpsert {
            key: key.clone(),
            day: request.day,
            psi: psi_map.clone(),
            max_psi_feature: max_psi_feature.clone(),
            max_psi,
        },
    )
    .await?;

    info!(
        computed = results.len(),
        skipped = skipped_low_sample.len(),
        missing = missing_baseline.len(),
        max_psi,
        "Computed daily drift"
    );

    Ok(DriftComputeAllResult {
        project_id: request.project_id.clone(),
        model_id: request.model_id.clone(),
        endpoint: request.endpoint.clone(),
        day: request.day,
        psi: psi_map,
        missing_baseline,
        skipped_low_sample,
        max_psi_feature,
        max_psi,
        max_severity: max_psi.map(Severity::from_psi),
        alert_created: None,
        alert_id: None,
        slack_alert_sent: None,
        slack_note: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use warden_types::baseline::OTHER_BUCKET;

    fn numeric_baseline(feature: &str, edges: Vec<f64>, probs: Vec<f64>) -> FeatureBaseline {
        FeatureBaseline {
            id: 1,
            project_id: "demo".to_string(),
            model_id: "churn".to_string(),
            endpoint: "predict".to_string(),
            feature: feature.to_string(),
            feature_type: FeatureType::Numeric,
            n_baseline: probs.len() as i64 * 50,
            definition: BaselineDefinition::Numeric { bin_edges: edges },
            baseline_probs: probs,
            created_at: chrono::Utc::now(),
        }
    }

    fn categorical_baseline(feature: &str, categories: Vec<&str>, probs: Vec<f64>) -> FeatureBaseline {
        FeatureBaseline {
            id: 2,
            project_id: "demo".to_string(),
            model_id: "churn".to_string(),
            endpoint: "predict".to_string(),
            feature: feature.to_string(),
            feature_type: FeatureType::Categorical,
            n_baseline: 100,
            definition: BaselineDefinition::Categorical {
                categories: categories.into_iter().map(String::from).collect(),
                other_bucket: true,
            },
            baseline_probs: probs,
            created_at: chrono::Utc::now(),
        }
    }

    fn samples_with_numeric(feature: &str, values: Vec<f64>) -> DaySamples {
        DaySamples {
            numeric: [(feature.to_string(), values)].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_distribution_is_ok() {
        let baseline = numeric_baseline("x", vec![0.0, 0.5, 1.0], vec![0.5, 0.5]);
        let samples = samples_with_numeric("x", vec![0.1, 0.2, 0.3, 0.6, 0.7, 0.8]);

        let entry = feature_psi_entry(&baseline, &samples, "x").unwrap();
        assert_relative_eq!(entry.psi, 0.0, epsilon = 1e-9);
        assert_eq!(entry.severity, Severity::Ok);
        assert_eq!(entry.n, 6);
        assert!(entry.categories.is_none());
    }

    #[test]
    fn test_out_of_range_day_alerts() {
        let baseline = numeric_baseline("x", vec![0.0, 0.5, 1.0], vec![0.5, 0.5]);
        // entirely above the baseline range: clamps into the last bin
        let samples = samples_with_numeric("x", vec![2.1, 2.5, 2.9, 2.2]);

        let entry = feature_psi_entry(&baseline, &samples, "x").unwrap();
        assert!(entry.psi >= 0.25);
        assert_eq!(entry.severity, Severity::Alert);
    }

    #[test]
    fn test_unseen_category_lands_in_other_bucket() {
        let baseline = categorical_baseline(
            "country",
            vec!["CA", "US", OTHER_BUCKET],
            vec![0.6, 0.39, 0.01],
        );
        let samples = DaySamples {
            categorical: [(
                "country".to_string(),
                std::iter::repeat("FR".to_string()).take(100).collect(),
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        };

        let entry = feature_psi_entry(&baseline, &samples, "country").unwrap();
        assert!(entry.psi > 0.0);
        assert_eq!(entry.severity, Severity::Alert);
        assert_eq!(
            entry.categories.as_deref().unwrap().last().map(String::as_str),
            Some(OTHER_BUCKET)
        );
    }

    #[test]
    fn test_missing_feature_yields_zero_sample() {
        let baseline = numeric_baseline("x", vec![0.0, 0.5, 1.0], vec![0.5, 0.5]);
        let samples = DaySamples::default();
        assert_eq!(sample_size(&baseline.definition, &samples, "x"), 0);

        // probabilities degrade to the zero vector rather than panicking
        let probs = actual_probs(&baseline.definition, &samples, "x");
        assert_eq!(probs, vec![0.0, 0.0]);
    }
}
