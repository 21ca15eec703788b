use crate::error::CostError;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{info, instrument};
use warden_settings::CostSettings;
use warden_sql::sql::traits::CostSqlLogic;
use warden_sql::sql::types::CostRowInsert;
use warden_sql::PostgresClient;
use warden_types::contracts::{CostPullRequest, CostPullResult};

/// Synthetic service row holding the per-day sum.
pub const TOTAL_SERVICE: &str = "TOTAL";

#[derive(Debug, Deserialize)]
struct BillingLine {
    service: String,
    amount: f64,
    #[serde(default = "default_unit")]
    unit: String,
}

fn default_unit() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize)]
struct BillingResponse {
    #[serde(default)]
    results: Vec<BillingLine>,
}

/// Thin client for the external billing API. All calls carry a bounded
/// timeout; an unconfigured base URL disables the client.
#[derive(Debug, Clone)]
pub struct BillingClient {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl BillingClient {
    pub fn new(settings: &CostSettings) -> Result<Self, CostError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CostError::CreateClientError(e.to_string()))?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_url.is_some()
    }

    /// Per-service cost lines for one day, with a computed TOTAL appended.
    pub async fn fetch_daily_costs(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<CostRowInsert>, CostError> {
        let api_url = self.api_url.as_ref().ok_or(CostError::Disabled)?;
        let url = format!("{}/daily", api_url.trim_end_matches('/'));

        let mut request = self.client.get(&url).query(&[("day", day.to_string())]);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.as_u16() >= 300 {
            let body = response.text().await.unwrap_or_default();
            return Err(CostError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BillingResponse = response.json().await?;
        let unit = parsed
            .results
            .first()
            .map(|line| line.unit.clone())
            .unwrap_or_else(default_unit);

        let mut rows: Vec<CostRowInsert> = parsed
            .results
            .into_iter()
            .map(|line| CostRowInsert {
                payload: json!({"service": line.service}),
                service: line.service,
                amount: line.amount,
                unit: line.unit,
            })
            .collect();

        if !rows.is_empty() {
            let total: f64 = rows.iter().map(|row| row.amount).sum();
            rows.push(CostRowInsert {
                service: TOTAL_SERVICE.to_string(),
                amount: total,
                unit,
                payload: json!({"computed_total_from_services": true}),
            });
        }

        Ok(rows)
    }
}

/// Fetch one day of costs from the billing API and store them for the
/// project.
#[instrument(skip(pool, client), fields(project_id = %request.project_id, day = %request.day))]
pub async fn pull_and_store_daily_costs(
    pool: &Pool<Postgres>,
    client: &BillingClient,
    request: &CostPullRequest,
) -> Result<CostPullResult, CostError> {
    let rows = client.fetch_daily_costs(request.day).await?;
    let stored = PostgresClient::replace_daily_costs(
        pool,
        &request.project_id,
        request.day,
        &rows,
        request.overwrite,
    )
    .await?;

    let total_row = rows.iter().find(|row| row.service == TOTAL_SERVICE);

    info!(rows = rows.len(), "Stored daily costs");

    Ok(CostPullResult {
        project_id: request.project_id.clone(),
        day: request.day,
        rows: rows.len(),
        total: total_row.map(|row| row.amount),
        unit: total_row
            .map(|row| row.unit.clone())
            .unwrap_or_else(default_unit),
        stored: stored as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn client_for(url: &str) -> BillingClient {
        BillingClient::new(&CostSettings {
            api_url: Some(url.to_string()),
            api_key: None,
            timeout_secs: 10,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_appends_total() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/daily")
            .match_query(mockito::Matcher::UrlEncoded(
                "day".into(),
                "2024-03-10".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"results": [
                    {"service": "compute", "amount": 12.5, "unit": "USD"},
                    {"service": "storage", "amount": 2.5, "unit": "USD"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let rows = client.fetch_daily_costs(day).await.unwrap();

        assert_eq!(rows.len(), 3);
        let total = rows.iter().find(|r| r.service == TOTAL_SERVICE).unwrap();
        assert_relative_eq!(total.amount, 15.0);
        assert_eq!(total.unit, "USD");
    }

    #[tokio::test]
    async fn test_fetch_failure_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/daily")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(matches!(
            client.fetch_daily_costs(day).await,
            Err(CostError::ApiStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_client_is_disabled() {
        let client = BillingClient::new(&CostSettings {
            api_url: None,
            api_key: None,
            timeout_secs: 10,
        })
        .unwrap();
        assert!(!client.is_configured());

        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(matches!(
            client.fetch_daily_costs(day).await,
            Err(CostError::Disabled)
        ));
    }
}
