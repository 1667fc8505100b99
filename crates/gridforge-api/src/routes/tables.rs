//! `/api/class-data-id` and `/api/class-data-id/{name}` (keyed record
//! tables).
//!
//! Documents pass through [`TableDocument::normalize`] on both read and
//! write, so every row the editors or generators see carries exactly the
//! declared columns with type-conforming cells.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use gridforge_core::schema::table::TableDocument;
use gridforge_store::{DocumentKind, ListEntry};

use crate::error::ApiError;
use crate::routes::{message, NameRequest};
use crate::AppState;

const KIND: DocumentKind = DocumentKind::ClassDataId;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/class-data-id",
            get(list).post(create).patch(remove_entry),
        )
        .route(
            "/api/class-data-id/{name}",
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
        "message": format!("Class data id {} created successfully", entry.name),
        "data": entry,
    })))
}

async fn remove_entry(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Json<Value>, ApiError> {
    state.store.remove_list_entry(KIND, &req.name)?;
    Ok(message(format!(
        "Class data id {} removed from class-data-id_list.json",
        req.name
    )))
}

async fn fetch(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TableDocument>, ApiError> {
    let value = state.store.load(KIND, &name)?;
    let mut doc: TableDocument = serde_json::from_value(value)?;
    doc.normalize(&state.store.reference_catalog()?);
    Ok(Json(doc))
}

async fn save(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(mut doc): Json<TableDocument>,
) -> Result<Json<Value>, ApiError> {
    doc.normalize(&state.store.reference_catalog()?);
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
