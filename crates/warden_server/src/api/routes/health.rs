use crate::api::state::AppState;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub fn get_health_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(&format!("{prefix}/health"), get(health_check))
}
