use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::{Pool, Postgres};
use std::time::Duration as StdDuration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use warden_costs::{pull_and_store_daily_costs, BillingClient};
use warden_dispatch::SlackNotifier;
use warden_drift::{compute_drift_all, process_drift_alert};
use warden_metrics::compute_daily_metrics;
use warden_settings::WorkerSettings;
use warden_sql::sql::error::SqlError;
use warden_sql::sql::traits::{BaselineSqlLogic, EventSqlLogic};
use warden_sql::PostgresClient;
use warden_types::contracts::{CostPullRequest, DriftComputeAllRequest, MetricsComputeRequest};
use warden_types::record::ModelKey;
use warden_types::util::{parse_timezone, today_in_tz};

/// Target day for a worker iteration: today in the worker timezone, backed
/// off by the configured offset (default 1, yesterday, so partial days are
/// never computed).
pub fn target_day(now: DateTime<Utc>, tz: Tz, day_offset: i64) -> NaiveDate {
    today_in_tz(now, tz) - Duration::days(day_offset)
}

/// Single-instance background loop: every iteration computes metrics,
/// drift, and costs for one day across all discovered keys. Storage unique
/// constraints make a second instance harmless, just wasteful.
pub struct DailyWorker {
    pool: Pool<Postgres>,
    notifier: SlackNotifier,
    billing: BillingClient,
    settings: WorkerSettings,
}

impl DailyWorker {
    pub fn new(
        pool: Pool<Postgres>,
        notifier: SlackNotifier,
        billing: BillingClient,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            pool,
            notifier,
            billing,
            settings,
        }
    }

    pub fn start(self, shutdown_rx: watch::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown_rx).await })
    }

    async fn run(self, mut shutdown: watch::Receiver<()>) {
        let tz = match parse_timezone(&self.settings.tz) {
            Ok(tz) => tz,
            Err(e) => {
                error!("Invalid WORKER_TZ ({e}); falling back to UTC");
                Tz::UTC
            }
        };
        let sleep = StdDuration::from_secs(self.settings.sleep_seconds);

        info!(
            tz = %tz,
            overwrite = self.settings.overwrite,
            sleep_seconds = self.settings.sleep_seconds,
            day_offset = self.settings.day_offset,
            "Worker starting"
        );

        loop {
            let day = target_day(Utc::now(), tz, self.settings.day_offset);
            if let Err(e) = self.run_once(day).await {
                error!("Worker iteration failed: {e}");
            }

            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Worker shutting down");
                    break;
                }
                _ = tokio::time::sleep(sleep) => {}
            }
        }
    }

    /// One pass over all discovered keys for a single day. Per-key failures
    /// are logged and never terminate the pass; only key discovery itself
    /// can fail it.
    #[instrument(skip(self))]
    pub async fn run_once(&self, day: NaiveDate) -> Result<(), SqlError> {
        let keys = PostgresClient::get_distinct_model_keys(&self.pool).await?;
        if keys.is_empty() {
            info!("No events found yet; skipping compute.");
            return Ok(());
        }
        let projects = PostgresClient::get_distinct_projects(&self.pool).await?;

        info!(keys = keys.len(), "Discovered model keys");

        for key in &keys {
            self.compute_metrics_for_key(key, day).await;
        }
        for key in &keys {
            self.compute_drift_for_key(key, day).await;
        }
        self.pull_costs(&projects, day).await;

        Ok(())
    }

    async fn compute_metrics_for_key(&self, key: &ModelKey, day: NaiveDate) {
        let request = MetricsComputeRequest {
            project_id: key.project_id.clone(),
            model_id: key.model_id.clone(),
            endpoint: key.endpoint.clone(),
            day,
            tz: self.settings.tz.clone(),
            overwrite: self.settings.overwrite,
        };

        match compute_daily_metrics(&self.pool, &request).await {
            Ok(row) => info!(key = %key, day = %day, n_events = row.n_events, "metrics ok"),
            Err(e) => error!(key = %key, day = %day, "metrics failed: {e}"),
        }
    }

    async fn compute_drift_for_key(&self, key: &ModelKey, day: NaiveDate) {
        // cheap pre-check so keys without baselines skip without running
        // the whole compute path
        match PostgresClient::count_feature_baselines(&self.pool, key).await {
            Ok(0) => {
                info!(key = %key, day = %day, "drift skipped (no baselines)");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!(key = %key, "drift baseline precheck failed: {e}");
                return;
            }
        }

        let request = DriftComputeAllRequest {
            project_id: key.project_id.clone(),
            model_id: key.model_id.clone(),
            endpoint: key.endpoint.clone(),
            day,
            tz: self.settings.tz.clone(),
            min_samples: self.settings.drift_min_samples,
            overwrite: true,
            alert: true,
            threshold: self.settings.drift_alert_threshold,
        };

        match compute_drift_all(&self.pool, &request).await {
            Ok(mut result) => {
                if let Err(e) =
                    process_drift_alert(&self.pool, &self.notifier, &mut result, request.threshold)
                        .await
                {
                    error!(key = %key, day = %day, "drift alerting failed: {e}");
                }
                info!(
                    key = %key,
                    day = %day,
                    max_psi = result.max_psi.unwrap_or(0.0),
                    missing_baseline = result.missing_baseline.len(),
                    "drift ok"
                );
            }
            Err(e) if e.is_expected_skip() => {
                info!(key = %key, day = %day, "drift skipped: {e}");
            }
            Err(e) => {
                error!(key = %key, day = %day, "drift failed: {e}");
            }
        }
    }

    /// Best-effort: billing credentials may be absent; keep the worker
    /// alive either way.
    async fn pull_costs(&self, projects: &[String], day: NaiveDate) {
        if !self.billing.is_configured() {
            debug!("Billing API not configured; skipping cost pull");
            return;
        }

        for project_id in projects {
            let request = CostPullRequest {
                project_id: project_id.clone(),
                day,
                overwrite: self.settings.overwrite,
            };
            match pull_and_store_daily_costs(&self.pool, &self.billing, &request).await {
                Ok(result) => {
                    info!(project_id = %project_id, day = %day, total = ?result.total, unit = %result.unit, "costs ok")
                }
                Err(e) => {
                    warn!(project_id = %project_id, day = %day, "costs skipped/failed (non-fatal): {e}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_day_backs_off_from_local_today() {
        let now = DateTime::parse_from_rfc3339("2024-03-10T07:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        // 07:30 UTC is still 2024-03-09 in Vancouver, so yesterday there is
        // the 8th
        let tz: Tz = "America/Vancouver".parse().unwrap();
        assert_eq!(
            target_day(now, tz, 1),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );

        assert_eq!(
            target_day(now, Tz::UTC, 1),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
        assert_eq!(
            target_day(now, Tz::UTC, 0),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
    }
}
