// events
const INSERT_EVENT: &str = include_str!("scripts/events/insert_event.sql");
const GET_EVENTS_WINDOW: &str = include_str!("scripts/events/get_events_window.sql");
const GET_RECENT_EVENTS: &str = include_str!("scripts/events/get_recent_events.sql");
const GET_DISTINCT_MODEL_KEYS: &str = include_str!("scripts/events/distinct_model_keys.sql");
const GET_DISTINCT_MODEL_KEYS_FOR_PROJECT: &str =
    include_str!("scripts/events/distinct_model_keys_for_project.sql");
const GET_DISTINCT_EVENT_DAYS: &str = include_str!("scripts/events/distinct_event_days.sql");
const GET_DISTINCT_PROJECTS: &str = include_str!("scripts/events/distinct_projects.sql");

// baselines
const INSERT_FEATURE_BASELINE: &str =
    include_str!("scripts/baselines/insert_feature_baseline.sql");
const DELETE_FEATURE_BASELINE: &str =
    include_str!("scripts/baselines/delete_feature_baseline.sql");
const GET_FEATURE_BASELINE: &str = include_str!("scripts/baselines/get_feature_baseline.sql");
const GET_FEATURE_BASELINES: &str = include_str!("scripts/baselines/get_feature_baselines.sql");
const COUNT_FEATURE_BASELINES: &str =
    include_str!("scripts/baselines/count_feature_baselines.sql");

// daily metrics
const INSERT_DAILY_METRIC: &str = include_str!("scripts/metrics/insert_daily_metric.sql");
const UPSERT_DAILY_METRIC: &str = include_str!("scripts/metrics/upsert_daily_metric.sql");
const GET_DAILY_METRIC: &str = include_str!("scripts/metrics/get_daily_metric.sql");

// daily drift
const UPSERT_DAILY_DRIFT: &str = include_str!("scripts/drift/upsert_daily_drift.sql");
const GET_DAILY_DRIFT: &str = include_str!("scripts/drift/get_daily_drift.sql");

// alerts
const INSERT_ALERT_ONCE: &str = include_str!("scripts/alerts/insert_alert_once.sql");
const GET_ALERTS: &str = include_str!("scripts/alerts/get_alerts.sql");

// costs
const DELETE_DAILY_COSTS: &str = include_str!("scripts/costs/delete_daily_costs.sql");
const INSERT_DAILY_COST: &str = include_str!("scripts/costs/insert_daily_cost.sql");
const GET_DAILY_COSTS: &str = include_str!("scripts/costs/get_daily_costs.sql");
const GET_TOTAL_COST: &str = include_str!("scripts/costs/get_total_cost.sql");
const GET_TRAILING_AVG_TOTAL: &str = include_str!("scripts/costs/trailing_avg_total.sql");

pub enum Queries {
    InsertEvent,
    GetEventsWindow,
    GetRecentEvents,
    GetDistinctModelKeys,
    GetDistinctModelKeysForProject,
    GetDistinctEventDays,
    GetDistinctProjects,
    InsertFeatureBaseline,
    DeleteFeatureBaseline,
    GetFeatureBaseline,
    GetFeatureBaselines,
    CountFeatureBaselines,
    InsertDailyMetric,
    UpsertDailyMetric,
    GetDailyMetric,
    UpsertDailyDrift,
    GetDailyDrift,
    InsertAlertOnce,
    GetAlerts,
    DeleteDailyCosts,
    InsertDailyCost,
    GetDailyCosts,
    GetTotalCost,
    GetTrailingAvgTotal,
}

impl Queries {
    pub fn get_query(&self) -> SqlQuery {
        match self {
            Queries::InsertEvent => SqlQuery::new(INSERT_EVENT),
            Queries::GetEventsWindow => SqlQuery::new(GET_EVENTS_WINDOW),
            Queries::GetRecentEvents => SqlQuery::new(GET_RECENT_EVENTS),
            Queries::GetDistinctModelKeys => SqlQuery::new(GET_DISTINCT_MODEL_KEYS),
            Queries::GetDistinctModelKeysForProject => {
                SqlQuery::new(GET_DISTINCT_MODEL_KEYS_FOR_PROJECT)
            }
            Queries::GetDistinctEventDays => SqlQuery::new(GET_DISTINCT_EVENT_DAYS),
            Queries::GetDistinctProjects => SqlQuery::new(GET_DISTINCT_PROJECTS),
            Queries::InsertFeatureBaseline => SqlQuery::new(INSERT_FEATURE_BASELINE),
            Queries::DeleteFeatureBaseline => SqlQuery::new(DELETE_FEATURE_BASELINE),
            Queries::GetFeatureBaseline => SqlQuery::new(GET_FEATURE_BASELINE),
            Queries::GetFeatureBaselines => SqlQuery::new(GET_FEATURE_BASELINES),
            Queries::CountFeatureBaselines => SqlQuery::new(COUNT_FEATURE_BASELINES),
            Queries::InsertDailyMetric => SqlQuery::new(INSERT_DAILY_METRIC),
            Queries::UpsertDailyMetric => SqlQuery::new(UPSERT_DAILY_METRIC),
            Queries::GetDailyMetric => SqlQuery::new(GET_DAILY_METRIC),
            Queries::UpsertDailyDrift => SqlQuery::new(UPSERT_DAILY_DRIFT),
            Queries::GetDailyDrift => SqlQuery::new(GET_DAILY_DRIFT),
            Queries::InsertAlertOnce => SqlQuery::new(INSERT_ALERT_ONCE),
            Queries::GetAlerts => SqlQuery::new(GET_ALERTS),
            Queries::DeleteDailyCosts => SqlQuery::new(DELETE_DAILY_COSTS),
            Queries::InsertDailyCost => SqlQuery::new(INSERT_DAILY_COST),
            Queries::GetDailyCosts => SqlQuery::new(GET_DAILY_COSTS),
            Queries::GetTotalCost => SqlQuery::new(GET_TOTAL_COST),
            Queries::GetTrailingAvgTotal => SqlQuery::new(GET_TRAILING_AVG_TOTAL),
        }
    }
}

pub struct SqlQuery {
    pub sql: String,
}

impl SqlQuery {
    fn new(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
        }
    }
}
