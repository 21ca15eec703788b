pub mod alert;
pub mod baseline;
pub mod cost;
pub mod drift;
pub mod event;
pub mod metric;

pub use alert::AlertSqlLogic;
pub use baseline::BaselineSqlLogic;
pub use cost::CostSqlLogic;
pub use drift::DriftSqlLogic;
pub use event::EventSqlLogic;
pub use metric::MetricSqlLogic;
