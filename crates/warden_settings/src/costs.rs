use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CostSettings {
    /// Billing API base URL. Unset disables cost ingestion.
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CostSettings {
    fn default() -> Self {
        let api_url = std::env::var("COST_API_URL").ok().filter(|url| !url.is_empty());
        let api_key = std::env::var("COST_API_KEY").ok();

        Self {
            api_url,
            api_key,
            timeout_secs: 10,
        }
    }
}

impl CostSettings {
    pub fn is_configured(&self) -> bool {
        self.api_url.is_some()
    }
}
