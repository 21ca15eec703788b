use crate::env_bool;
use serde::Serialize;
use tracing::warn;

const DEFAULT_API_KEY: &str = "demo-key";

#[derive(Debug, Clone, Serialize)]
pub struct AuthSettings {
    pub enabled: bool,
    pub header_name: String,
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        let enabled = env_bool("AUTH_ENABLED", true);
        let header_name =
            std::env::var("API_KEY_HEADER").unwrap_or_else(|_| "X-API-Key".to_string());
        let api_key = std::env::var("WARDEN_API_KEY").unwrap_or_else(|_| {
            if enabled {
                warn!("WARDEN_API_KEY not set; using the development default");
            }
            DEFAULT_API_KEY.to_string()
        });

        Self {
            enabled,
            header_name,
            api_key,
        }
    }
}
