use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use warden_costs::CostError;
use warden_dispatch::DispatchError;
use warden_drift::DriftError;
use warden_metrics::MetricError;
use warden_sql::sql::error::SqlError;
use warden_types::error::TypeError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid API key")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    DriftError(#[from] DriftError),

    #[error(transparent)]
    MetricError(#[from] MetricError),

    #[error(transparent)]
    CostError(#[from] CostError),

    #[error(transparent)]
    DispatchError(#[from] DispatchError),

    #[error(transparent)]
    SqlError(#[from] SqlError),

    #[error(transparent)]
    TypeError(#[from] TypeError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServerError::TypeError(_) => StatusCode::BAD_REQUEST,
            ServerError::DriftError(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::MetricError(MetricError::TypeError(_)) => StatusCode::BAD_REQUEST,
            // webhook failures surface as a client-visible 400 on the
            // explicit test endpoint
            ServerError::DispatchError(_) => StatusCode::BAD_REQUEST,
            ServerError::CostError(e) => match e {
                CostError::Disabled | CostError::NotEnoughHistory => StatusCode::BAD_REQUEST,
                CostError::TotalMissing { .. } => StatusCode::NOT_FOUND,
                CostError::ApiStatus { .. } | CostError::RequestError(_) => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_drift_errors_are_client_errors() {
        let err = ServerError::DriftError(DriftError::NoBaselines("demo/churn/predict".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ServerError::DriftError(DriftError::NotEnoughData {
            feature: "age".into(),
            got: 3,
            required: 10,
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unexpected_errors_are_500() {
        let err = ServerError::DriftError(DriftError::SqlError(SqlError::ConnectionError(
            "refused".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_and_lookup_mapping() {
        assert_eq!(
            ServerError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::NotFound("row".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
