use crate::api::error::ServerError;
use crate::api::state::AppState;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use warden_sql::sql::traits::EventSqlLogic;
use warden_sql::sql::types::EventInsert;
use warden_sql::PostgresClient;
use warden_types::contracts::{IngestBody, IngestResponse};

/// Ingest one event or a batch. Ordering within the batch is preserved;
/// nothing persists unless the whole batch commits.
pub async fn ingest_events(
    State(data): State<Arc<AppState>>,
    Json(body): Json<IngestBody>,
) -> Result<Json<IngestResponse>, ServerError> {
    let events = body.into_events();
    let now = Utc::now();

    let mut rows: Vec<EventInsert> = Vec::with_capacity(events.len());
    for event in events {
        if event.features.is_empty() {
            return Err(ServerError::InvalidInput(
                "features must be a non-empty object".to_string(),
            ));
        }
        rows.push(EventInsert {
            timestamp: event.normalized_timestamp(now),
            project_id: event.project_id,
            model_id: event.model_id,
            endpoint: event.endpoint,
            latency_ms: event.latency_ms,
            y_pred: event.y_pred,
            y_proba: event.y_proba,
            features: event.features,
        });
    }

    let inserted = PostgresClient::insert_events(&data.db_pool, &rows).await?;
    debug!(inserted, "Ingested events");

    Ok(Json(IngestResponse {
        inserted: inserted as usize,
    }))
}

pub fn get_event_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(&format!("{prefix}/events"), post(ingest_events))
}
