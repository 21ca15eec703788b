pub mod alerts;
pub mod costs;
pub mod discover;
pub mod drift;
pub mod events;
pub mod health;
pub mod metrics;

pub use alerts::get_alert_router;
pub use costs::get_cost_router;
pub use discover::get_discover_router;
pub use drift::get_drift_router;
pub use events::get_event_router;
pub use health::get_health_router;
pub use metrics::get_metric_router;
