use crate::api::error::ServerError;
use crate::api::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

/// Shared-secret header check applied to every route except health. A
/// constant-time comparison is unnecessary here; the key is a capability
/// token, not a password hash.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let auth = &state.config.auth_settings;
    if !auth.enabled {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(auth.header_name.as_str())
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key == auth.api_key => Ok(next.run(request).await),
        _ => Err(ServerError::Unauthorized),
    }
}
