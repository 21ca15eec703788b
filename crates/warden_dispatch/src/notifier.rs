use crate::error::DispatchError;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use warden_settings::SlackSettings;
use warden_types::record::ModelKey;
use warden_types::severity::Severity;

/// Posts alert messages to a Slack-compatible incoming webhook.
///
/// Callers treating notification as best-effort catch `Disabled` and record
/// a note instead of failing the originating action.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    enabled: bool,
}

impl SlackNotifier {
    pub fn new(settings: &SlackSettings) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DispatchError::CreateClientError(e.to_string()))?;

        Ok(Self {
            client,
            webhook_url: settings.webhook_url.clone(),
            enabled: settings.enabled,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.enabled && self.webhook_url.is_some()
    }

    /// POST `{"text": ..., "blocks": [...]}` to the webhook. HTTP >= 300 is
    /// a failure.
    pub async fn send_message(
        &self,
        text: &str,
        blocks: Option<Value>,
    ) -> Result<(), DispatchError> {
        if !self.enabled {
            return Err(DispatchError::Disabled);
        }
        let url = self.webhook_url.as_ref().ok_or(DispatchError::Disabled)?;

        let mut body = json!({ "text": text });
        if let Some(blocks) = blocks {
            body["blocks"] = blocks;
        }

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();
        if status.as_u16() >= 300 {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::WebhookStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Slack message delivered");
        Ok(())
    }

    pub async fn send_test_message(&self) -> Result<(), DispatchError> {
        self.send_message(":white_check_mark: warden Slack test alert (webhook connected).", None)
            .await
    }

    pub async fn send_drift_alert(
        &self,
        key: &ModelKey,
        day: NaiveDate,
        feature: &str,
        psi: f64,
        threshold: f64,
        severity: Severity,
    ) -> Result<(), DispatchError> {
        let text = format!(
            ":rotating_light: warden drift alert\nmodel={key} day={day}\nfeature={feature} psi={psi:.4} threshold={threshold:.2} severity={severity}"
        );
        let blocks = json!([
            {
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": ":rotating_light: Drift Detected :rotating_light:"
                }
            },
            {
                "type": "section",
                "fields": [
                    {"type": "mrkdwn", "text": format!("*Model:*\n{key}")},
                    {"type": "mrkdwn", "text": format!("*Day:*\n{day}")},
                    {"type": "mrkdwn", "text": format!("*Feature:*\n{feature}")},
                    {"type": "mrkdwn", "text": format!("*PSI:*\n{psi:.4} (threshold {threshold:.2})")},
                    {"type": "mrkdwn", "text": format!("*Severity:*\n{severity}")}
                ]
            }
        ]);

        self.send_message(&text, Some(blocks)).await
    }

    pub async fn send_cost_alert(
        &self,
        project_id: &str,
        day: NaiveDate,
        total: f64,
        trailing_avg: f64,
        computed_threshold: f64,
        pct: f64,
    ) -> Result<(), DispatchError> {
        let text = format!(
            ":rotating_light: warden cost spike\nproject={project_id} day={day}\ntotal=${total:.2} avg=${trailing_avg:.2} threshold=${computed_threshold:.2} (+{:.0}%)",
            pct * 100.0
        );
        self.send_message(&text, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(url: &str) -> SlackSettings {
        SlackSettings {
            enabled: true,
            webhook_url: Some(url.to_string()),
            timeout_secs: 10,
        }
    }

    #[tokio::test]
    async fn test_send_message_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/json")
            .with_status(200)
            .create_async()
            .await;

        let notifier = SlackNotifier::new(&settings_for(&server.url())).unwrap();
        notifier.send_message("hello", None).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_over_300_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body("upstream broke")
            .create_async()
            .await;

        let notifier = SlackNotifier::new(&settings_for(&server.url())).unwrap();
        let err = notifier.send_message("hello", None).await.unwrap_err();
        match err {
            DispatchError::WebhookStatus { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("upstream broke"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disabled_notifier_errors() {
        let settings = SlackSettings {
            enabled: false,
            webhook_url: None,
            timeout_secs: 10,
        };
        let notifier = SlackNotifier::new(&settings).unwrap();
        assert!(!notifier.is_configured());
        assert!(matches!(
            notifier.send_message("hello", None).await,
            Err(DispatchError::Disabled)
        ));
    }
}
