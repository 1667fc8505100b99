//! `/api/class-data-matrix-id` and `/api/class-data-matrix-id/{name}`.
//!
//! Matrix axes live in other documents, so the cell map can drift between
//! requests. Both read and write run [`MatrixDocument::reconcile_keys`]
//! against the current catalogs before the document leaves the handler.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use gridforge_core::schema::matrix::MatrixDocument;
use gridforge_store::{DocumentKind, ListEntry};

use crate::error::ApiError;
use crate::routes::{message, NameRequest};
use crate::AppState;

const KIND: DocumentKind = DocumentKind::ClassDataMatrixId;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/class-data-matrix-id",
            get(list).post(create).patch(remove_entry),
        )
        .route(
            "/api/class-data-matrix-id/{name}",
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
    let row_id = req.row_id.unwrap_or_default();
    let col_id = req.col_id.unwrap_or_default();
    if row_id.trim().is_empty() || col_id.trim().is_empty() {
        return Err(ApiError::bad_request("rowId and colId are required"));
    }
    let entry = state.store.create(
        KIND,
        ListEntry {
            row_id: Some(row_id),
            col_id: Some(col_id),
            ..ListEntry::new(0, &req.name)
        },
    )?;
    Ok(Json(json!({
        "message": format!("Matrix {} created successfully", entry.name),
        "data": entry,
    })))
}

async fn remove_entry(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Json<Value>, ApiError> {
    state.store.remove_list_entry(KIND, &req.name)?;
    Ok(message(format!(
        "Matrix {} removed from class-data-matrix-id_list.json",
        req.name
    )))
}

async fn fetch(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MatrixDocument>, ApiError> {
    let value = state.store.load(KIND, &name)?;
    let mut doc: MatrixDocument = serde_json::from_value(value)?;
    let catalog = state.store.reference_catalog()?;
    let row_keys = doc.row_keys(&catalog).to_vec();
    let col_keys = doc.col_keys(&catalog).to_vec();
    doc.reconcile_keys(&row_keys, &col_keys, &catalog);
    Ok(Json(doc))
}

async fn save(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(mut doc): Json<MatrixDocument>,
) -> Result<Json<Value>, ApiError> {
    let catalog = state.store.reference_catalog()?;
    let row_keys = doc.row_keys(&catalog).to_vec();
    let col_keys = doc.col_keys(&catalog).to_vec();
    doc.reconcile_keys(&row_keys, &col_keys, &catalog);
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
