use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use models::record::{Record, RecordInput};
use service::record::{service::RecordService, store::RecordStore};

use crate::errors::JsonApiError;

/// Shared handler state: the record service over the injected store handle.
pub struct AppState<S: RecordStore> {
    pub records: Arc<RecordService<S>>,
}

impl<S: RecordStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

pub async fn create<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Json(input): Json<RecordInput>,
) -> Result<(StatusCode, Json<Record>), JsonApiError> {
    let record = state.records.create(input).await?;
    info!(record_id = %record.id, "created record");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<HashMap<String, Record>>, JsonApiError> {
    let records = state.records.get_all().await?;
    info!(count = records.len(), "list records");
    Ok(Json(records))
}

pub async fn get<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Record>, JsonApiError> {
    match state.records.get_one(&id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(JsonApiError::not_found(format!("no record with id {}", id))),
    }
}

pub async fn update<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(input): Json<RecordInput>,
) -> Result<Json<Record>, JsonApiError> {
    let record = state.records.update(&id, input).await?;
    Ok(Json(record))
}

pub async fn remove<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    state.records.delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
