use crate::error::CostError;
use sqlx::{Pool, Postgres};
use tracing::instrument;
use warden_sql::sql::traits::CostSqlLogic;
use warden_sql::PostgresClient;
use warden_types::contracts::CostSpikeRequest;
use warden_types::severity::Severity;

pub const COST_SPIKE_RULE: &str = "cost_spike";

/// Outcome of comparing a day's TOTAL against its trailing average.
#[derive(Debug, Clone)]
pub struct SpikeEvaluation {
    pub total: f64,
    pub unit: String,
    pub trailing_avg: f64,
    pub computed_threshold: f64,
    pub is_spike: bool,
    pub severity: Severity,
}

/// A spike requires both the relative threshold (trailing average grown by
/// `pct`) and the absolute floor to be exceeded; tiny projects stay quiet.
pub fn classify_spike(
    total: f64,
    trailing_avg: f64,
    pct: f64,
    min_abs: f64,
) -> (f64, bool, Severity) {
    let computed_threshold = trailing_avg * (1.0 + pct);
    let is_spike = total >= computed_threshold && (total - trailing_avg) >= min_abs;
    let severity = if !is_spike {
        Severity::Ok
    } else if pct >= 0.25 {
        Severity::Alert
    } else {
        Severity::Warn
    };
    (computed_threshold, is_spike, severity)
}

/// Evaluate the spike rule for a stored (project, day) TOTAL.
#[instrument(skip(pool), fields(project_id = %request.project_id, day = %request.day))]
pub async fn evaluate_spike(
    pool: &Pool<Postgres>,
    request: &CostSpikeRequest,
) -> Result<SpikeEvaluation, CostError> {
    let total_row = PostgresClient::get_total_cost(pool, &request.project_id, request.day)
        .await?
        .ok_or_else(|| CostError::TotalMissing {
            project_id: request.project_id.clone(),
            day: request.day.to_string(),
        })?;

    let trailing_avg = PostgresClient::trailing_average_total(
        pool,
        &request.project_id,
        request.day,
        request.lookback_days,
    )
    .await?
    .ok_or(CostError::NotEnoughHistory)?;

    let (computed_threshold, is_spike, severity) = classify_spike(
        total_row.amount,
        trailing_avg,
        request.pct,
        request.min_abs,
    );

    Ok(SpikeEvaluation {
        total: total_row.amount,
        unit: total_row.unit,
        trailing_avg,
        computed_threshold,
        is_spike,
        severity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spike_requires_both_thresholds() {
        // relative breach but under the absolute floor
        let (_, is_spike, severity) = classify_spike(1.6, 1.0, 0.5, 5.0);
        assert!(!is_spike);
        assert_eq!(severity, Severity::Ok);

        // both breached
        let (threshold, is_spike, severity) = classify_spike(160.0, 100.0, 0.5, 5.0);
        assert_relative_eq!(threshold, 150.0);
        assert!(is_spike);
        assert_eq!(severity, Severity::Alert);
    }

    #[test]
    fn test_small_pct_spike_is_warn() {
        let (_, is_spike, severity) = classify_spike(120.0, 100.0, 0.1, 5.0);
        assert!(is_spike);
        assert_eq!(severity, Severity::Warn);
    }

    #[test]
    fn test_below_threshold_is_ok() {
        let (_, is_spike, severity) = classify_spike(110.0, 100.0, 0.5, 5.0);
        assert!(!is_spike);
        assert_eq!(severity, Severity::Ok);
    }
}
