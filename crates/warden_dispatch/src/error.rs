use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Slack webhook is not configured")]
    Disabled,

    #[error("Failed to create http client: {0}")]
    CreateClientError(String),

    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    #[error("Slack webhook returned {status}: {body}")]
    WebhookStatus { status: u16, body: String },
}
