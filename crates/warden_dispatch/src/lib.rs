pub mod error;
pub mod notifier;

pub use error::DispatchError;
pub use notifier::SlackNotifier;
