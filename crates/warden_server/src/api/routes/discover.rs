use crate::api::error::ServerError;
use crate::api::state::AppState;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use std::sync::Arc;
use warden_sql::sql::traits::EventSqlLogic;
use warden_sql::PostgresClient;
use warden_types::contracts::{DiscoverDaysRequest, DiscoverModelsRequest};
use warden_types::record::ModelKey;

pub async fn discover_models(
    State(data): State<Arc<AppState>>,
    Query(params): Query<DiscoverModelsRequest>,
) -> Result<Json<Vec<ModelKey>>, ServerError> {
    let keys =
        PostgresClient::get_model_keys_for_project(&data.db_pool, &params.project_id).await?;
    Ok(Json(keys))
}

pub async fn discover_days(
    State(data): State<Arc<AppState>>,
    Query(params): Query<DiscoverDaysRequest>,
) -> Result<Json<Vec<NaiveDate>>, ServerError> {
    let key = ModelKey {
        project_id: params.project_id,
        model_id: params.model_id,
        endpoint: params.endpoint,
    };
    let days = PostgresClient::get_event_days(&data.db_pool, &key).await?;
    Ok(Json(days))
}

pub fn get_discover_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{prefix}/discover/models"), get(discover_models))
        .route(&format!("{prefix}/discover/days"), get(discover_days))
}
