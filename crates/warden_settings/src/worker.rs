use crate::{env_bool, env_parse};
use serde::Serialize;

const MIN_SLEEP_SECONDS: u64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct WorkerSettings {
    pub enabled: bool,
    pub tz: String,
    pub overwrite: bool,
    pub sleep_seconds: u64,
    pub drift_min_samples: usize,
    pub drift_alert_threshold: f64,
    pub day_offset: i64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        let enabled = env_bool("WORKER_ENABLED", true);
        let tz = std::env::var("WORKER_TZ").unwrap_or_else(|_| "UTC".to_string());
        let overwrite = env_bool("WORKER_OVERWRITE", true);
        let sleep_seconds = env_parse("WORKER_SLEEP_SECONDS", 300u64).max(MIN_SLEEP_SECONDS);
        let drift_min_samples = env_parse("WORKER_DRIFT_MIN_SAMPLES", 10usize);
        let drift_alert_threshold = env_parse("WORKER_DRIFT_ALERT_THRESHOLD", 0.25f64);
        let day_offset = env_parse("WORKER_DAY_OFFSET", 1i64);

        Self {
            enabled,
            tz,
            overwrite,
            sleep_seconds,
            drift_min_samples,
            drift_alert_threshold,
            day_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_floor() {
        // env-free default path
        let settings = WorkerSettings::default();
        assert!(settings.sleep_seconds >= MIN_SLEEP_SECONDS);
    }
}
