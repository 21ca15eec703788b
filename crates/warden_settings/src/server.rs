use crate::{AuthSettings, CostSettings, DatabaseSettings, SlackSettings, WorkerSettings};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    pub database_settings: DatabaseSettings,
    pub auth_settings: AuthSettings,
    pub slack_settings: SlackSettings,
    pub worker_settings: WorkerSettings,
    pub cost_settings: CostSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let port = crate::env_parse("WARDEN_SERVER_PORT", 8000u16);

        Self {
            port,
            database_settings: DatabaseSettings::default(),
            auth_settings: AuthSettings::default(),
            slack_settings: SlackSettings::default(),
            worker_settings: WorkerSettings::default(),
            cost_settings: CostSettings::default(),
        }
    }
}
