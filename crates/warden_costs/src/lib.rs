pub mod billing;
pub mod error;
pub mod spike;

pub use billing::{pull_and_store_daily_costs, BillingClient, TOTAL_SERVICE};
pub use error::CostError;
pub use spike::{evaluate_spike, SpikeEvaluation, COST_SPIKE_RULE};
