use crate::env_bool;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SlackSettings {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SlackSettings {
    fn default() -> Self {
        let webhook_url = std::env::var("SLACK_WEBHOOK_URL").ok().filter(|url| !url.is_empty());
        let enabled = env_bool("SLACK_ENABLED", webhook_url.is_some());

        Self {
            enabled,
            webhook_url,
            timeout_secs: 10,
        }
    }
}

impl SlackSettings {
    pub fn is_configured(&self) -> bool {
        self.enabled && self.webhook_url.is_some()
    }
}
