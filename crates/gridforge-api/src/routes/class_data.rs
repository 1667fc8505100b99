//! `/api/class-data` and `/api/class-data/{name}`.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use gridforge_core::schema::class::ClassDocument;
use gridforge_store::{DocumentKind, ListEntry};

use crate::error::ApiError;
use crate::routes::{message, NameRequest};
use crate::AppState;

const KIND: DocumentKind = DocumentKind::ClassData;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/class-data",
            get(list).post(create).patch(remove_entry),
        )
        .route(
            "/api/class-data/{name}",
            get(fetch).post(save).delete(delete_doc),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<ListEntry>>, ApiError> {
    Ok(Json(state.store.list(KIND)?))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Json<Value>, ApiError> {
    let entry = state.store.create(KIND, ListEntry::new(0, &req.name))?;
    Ok(Json(json!({
        "message": format!("Class {} created successfully", entry.name),
        "data": entry,
    })))
}

async fn remove_entry(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Json<Value>, ApiError> {
    state.store.remove_list_entry(KIND, &req.name)?;
    Ok(message(format!(
        "Class {} removed from class-data_list.json",
        req.name
    )))
}

async fn fetch(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClassDocument>, ApiError> {
    let value = state.store.load(KIND, &name)?;
    Ok(Json(serde_json::from_value(value)?))
}

async fn save(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(doc): Json<ClassDocument>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .save(KIND, &name, &serde_json::to_value(&doc)?)?;
    Ok(message(format!("{name}.json saved successfully")))
}

async fn delete_doc(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(KIND, &name)?;
    Ok(message(format!("{name}.json deleted successfully")))
}
