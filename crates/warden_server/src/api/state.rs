use sqlx::{Pool, Postgres};
use std::sync::Arc;
use warden_dispatch::SlackNotifier;
use warden_settings::ServerConfig;

pub struct AppState {
    pub db_pool: Pool<Postgres>,
    pub config: Arc<ServerConfig>,
    pub notifier: SlackNotifier,
}

impl AppState {
    pub async fn shutdown(&self) {
        self.db_pool.close().await;
    }
}
