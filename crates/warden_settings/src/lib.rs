pub mod auth;
pub mod costs;
pub mod database;
pub mod server;
pub mod slack;
pub mod worker;

pub use auth::AuthSettings;
pub use costs::CostSettings;
pub use database::DatabaseSettings;
pub use server::ServerConfig;
pub use slack::SlackSettings;
pub use worker::WorkerSettings;

pub(crate) fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) if !raw.is_empty() => raw.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("Could not parse {name}; using default");
            default
        }),
        _ => default,
    }
}

pub(crate) fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}
