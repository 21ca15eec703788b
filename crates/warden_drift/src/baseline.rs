use crate::binning::{categorical_probs, equal_width_edges, histogram_probs};
use crate::error::DriftError;
use crate::utils::collect_feature_sample;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use itertools::Itertools;
use sqlx::{Pool, Postgres};
use std::collections::HashMap;
use tracing::{info, instrument};
use warden_sql::sql::traits::{BaselineSqlLogic, EventSqlLogic};
use warden_sql::sql::types::FeatureBaselineInsert;
use warden_sql::PostgresClient;
use warden_types::baseline::{BaselineDefinition, OTHER_BUCKET};
use warden_types::contracts::{BaselineCaptureRequest, BaselineCaptureResult};
use warden_types::feature::FeatureType;
use warden_types::record::Event;
use warden_types::util::{day_window, parse_timezone};

/// Minimum categorical sample for a baseline, and the numeric floor before
/// the 2-per-bin requirement kicks in.
const BASELINE_SAMPLE_FLOOR: usize = 20;

/// Event window a baseline is captured from. Resolution precedence:
/// explicit instants, then local-day range, then most-recent-n.
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineWindow {
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Days {
        start_day: NaiveDate,
        end_day: NaiveDate,
        tz: Tz,
    },
    Recent {
        n: i64,
    },
}

impl BaselineWindow {
    pub fn from_request(request: &BaselineCaptureRequest) -> Result<Self, DriftError> {
        match (
            request.start_ts,
            request.end_ts,
            request.start_day,
            request.end_day,
        ) {
            (Some(start), Some(end), _, _) => {
                if end <= start {
                    return Err(DriftError::InvalidInput(
                        "end_ts must be after start_ts".to_string(),
                    ));
                }
                Ok(BaselineWindow::Range { start, end })
            }
            (Some(_), None, _, _) | (None, Some(_), _, _) => Err(DriftError::InvalidInput(
                "start_ts and end_ts must be provided together".to_string(),
            )),
            (None, None, Some(start_day), Some(end_day)) => {
                if end_day <= start_day {
                    return Err(DriftError::InvalidInput(
                        "end_day must be after start_day".to_string(),
                    ));
                }
                let tz = parse_timezone(&request.tz)?;
                Ok(BaselineWindow::Days {
                    start_day,
                    end_day,
                    tz,
                })
            }
            (None, None, Some(_), None) | (None, None, None, Some(_)) => {
                Err(DriftError::InvalidInput(
                    "start_day and end_day must be provided together".to_string(),
                ))
            }
            (None, None, None, None) => Ok(BaselineWindow::Recent {
                n: request.fallback_n(),
            }),
        }
    }
}

async fn load_window_events(
    pool: &Pool<Postgres>,
    request: &BaselineCaptureRequest,
    window: &BaselineWindow,
) -> Result<Vec<Event>, DriftError> {
    let key = request.key();
    let events = match window {
        BaselineWindow::Range { start, end } => {
            PostgresClient::get_events_in_window(pool, &key, *start, *end).await?
        }
        BaselineWindow::Days {
            start_day,
            end_day,
            tz,
        } => {
            let (start, _) = day_window(*start_day, *tz)?;
            let (end, _) = day_window(*end_day, *tz)?;
            PostgresClient::get_events_in_window(pool, &key, start, end).await?
        }
        BaselineWindow::Recent { n } => PostgresClient::get_recent_events(pool, &key, *n).await?,
    };

    if events.is_empty() {
        return Err(DriftError::NoEvents(format!("{key} in baseline window")));
    }
    Ok(events)
}

fn numeric_definition(
    values: &[f64],
    n_bins: usize,
) -> Result<(BaselineDefinition, Vec<f64>), DriftError> {
    let edges = equal_width_edges(values, n_bins)?;
    let probs = histogram_probs(values, &edges);
    Ok((BaselineDefinition::Numeric { bin_edges: edges }, probs))
}

fn categorical_definition(
    values: &[String],
    top_k_categories: usize,
) -> (BaselineDefinition, Vec<f64>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }

    // descending count, name as tiebreak so capture is deterministic
    let mut categories: Vec<String> = counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .take(top_k_categories)
        .map(|(category, _)| category.to_string())
        .collect();
    categories.push(OTHER_BUCKET.to_string());

    let probs = categorical_probs(values, &categories);
    (
        BaselineDefinition::Categorical {
            categories,
            other_bucket: true,
        },
        probs,
    )
}

/// Capture a reference distribution for one feature from historical events.
///
/// The value type is dispatched from the sample itself: mostly-numeric
/// observations produce a fixed-edge histogram, otherwise a fixed-category
/// frequency table with an other-bucket.
#[instrument(skip(pool), fields(feature = %request.feature))]
pub async fn capture_feature_baseline(
    pool: &Pool<Postgres>,
    request: &BaselineCaptureRequest,
) -> Result<BaselineCaptureResult, DriftError> {
    if request.n_bins < 2 {
        return Err(DriftError::InvalidInput(format!(
            "n_bins must be at least 2, got {}",
            request.n_bins
        )));
    }
    if request.top_k_categories == 0 {
        return Err(DriftError::InvalidInput(
            "top_k_categories must be positive".to_string(),
        ));
    }

    let window = BaselineWindow::from_request(request)?;
    let events = load_window_events(pool, request, &window).await?;
    let sample = collect_feature_sample(&events, &request.feature);

    let treat_as_numeric =
        sample.numeric.len() >= sample.categorical.len() && !sample.numeric.is_empty();

    let (feature_type, n_baseline, definition, baseline_probs) = if treat_as_numeric {
        let floor = BASELINE_SAMPLE_FLOOR.max(2 * request.n_bins);
        if sample.numeric.len() < floor {
            return Err(DriftError::NotEnoughData {
                feature: request.feature.clone(),
                got: sample.numeric.len(),
                required: floor,
            });
        }
        let (definition, probs) = numeric_definition(&sample.numeric, request.n_bins)?;
        (
            FeatureType::Numeric,
            sample.numeric.len(),
            definition,
            probs,
        )
    } else {
        if sample.categorical.len() < BASELINE_SAMPLE_FLOOR {
            return Err(DriftError::NotEnoughData {
                feature: request.feature.clone(),
                got: sample.categorical.len(),
                required: BASELINE_SAMPLE_FLOOR,
            });
        }
        let (definition, probs) =
            categorical_definition(&sample.categorical, request.top_k_categories);
        (
            FeatureType::Categorical,
            sample.categorical.len(),
            definition,
            probs,
        )
    };

    let record = FeatureBaselineInsert {
        key: request.key(),
        feature: request.feature.clone(),
        feature_type,
        n_baseline: n_baseline as i64,
        definition: definition.clone(),
        baseline_probs: baseline_probs.clone(),
    };
    PostgresClient::insert_feature_baseline(pool, &record, request.overwrite).await?;

    info!(
        key = %request.key(),
        feature_type = %feature_type,
        n_baseline,
        "Captured feature baseline"
    );

    Ok(BaselineCaptureResult {
        project_id: request.project_id.clone(),
        model_id: request.model_id.clone(),
        endpoint: request.endpoint.clone(),
        feature: request.feature.clone(),
        feature_type,
        n_baseline,
        definition,
        baseline_probs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn capture_request(overrides: serde_json::Value) -> BaselineCaptureRequest {
        let mut base = json!({
            "project_id": "demo",
            "model_id": "churn",
            "feature": "age"
        });
        base.as_object_mut()
            .unwrap()
            .extend(overrides.as_object().unwrap().clone());
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_window_defaults_to_recent_n() {
        let request = capture_request(json!({}));
        let window = BaselineWindow::from_request(&request).unwrap();
        assert_eq!(window, BaselineWindow::Recent { n: 500 });
    }

    #[test]
    fn test_explicit_range_takes_precedence() {
        let request = capture_request(json!({
            "start_ts": "2024-01-01T00:00:00Z",
            "end_ts": "2024-02-01T00:00:00Z",
            "start_day": "2024-01-05",
            "end_day": "2024-01-06",
            "n": 100
        }));
        assert!(matches!(
            BaselineWindow::from_request(&request).unwrap(),
            BaselineWindow::Range { .. }
        ));
    }

    #[test]
    fn test_half_open_day_range() {
        let request = capture_request(json!({
            "start_day": "2024-01-05",
            "end_day": "2024-01-08",
            "tz": "America/Vancouver"
        }));
        let window = BaselineWindow::from_request(&request).unwrap();
        match window {
            BaselineWindow::Days {
                start_day, end_day, ..
            } => {
                assert_eq!(start_day.to_string(), "2024-01-05");
                assert_eq!(end_day.to_string(), "2024-01-08");
            }
            other => panic!("unexpected window: {other:?}"),
        }
    }

    #[test]
    fn test_partial_selectors_are_invalid() {
        let request = capture_request(json!({"start_ts": "2024-01-01T00:00:00Z"}));
        assert!(matches!(
            BaselineWindow::from_request(&request),
            Err(DriftError::InvalidInput(_))
        ));

        let request = capture_request(json!({"end_day": "2024-01-08"}));
        assert!(matches!(
            BaselineWindow::from_request(&request),
            Err(DriftError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_day_range_is_invalid() {
        let request = capture_request(json!({
            "start_day": "2024-01-08",
            "end_day": "2024-01-08"
        }));
        assert!(matches!(
            BaselineWindow::from_request(&request),
            Err(DriftError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_categorical_definition_keeps_top_k_plus_other() {
        let values: Vec<String> = std::iter::repeat("CA".to_string())
            .take(50)
            .chain(std::iter::repeat("US".to_string()).take(30))
            .chain(std::iter::repeat("FR".to_string()).take(5))
            .collect();

        let (definition, probs) = categorical_definition(&values, 2);
        match &definition {
            BaselineDefinition::Categorical {
                categories,
                other_bucket,
            } => {
                assert_eq!(categories, &vec!["CA".to_string(), "US".to_string(), OTHER_BUCKET.to_string()]);
                assert!(other_bucket);
            }
            other => panic!("unexpected definition: {other:?}"),
        }
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(probs[2], 5.0 / 85.0);
    }

    #[test]
    fn test_numeric_definition_dimensions() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let (definition, probs) = numeric_definition(&values, 10).unwrap();
        match definition {
            BaselineDefinition::Numeric { bin_edges } => assert_eq!(bin_edges.len(), 11),
            other => panic!("unexpected definition: {other:?}"),
        }
        assert_eq!(probs.len(), 10);
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }
}
