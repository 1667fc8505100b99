//! `/api/state-data` and its sub-resources.
//!
//! The editors save transitions, per-transition variables, and the manager
//! list through separate requests against one stored document. Each save
//! loads the document, patches the addressed section, and writes the whole
//! document back, last write wins.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use gridforge_core::schema::class::VariableRow;
use gridforge_core::schema::state::{StateDocument, Transition};
use gridforge_store::{DocumentKind, ListEntry, Store};

use crate::error::ApiError;
use crate::routes::{message, NameRequest};
use crate::AppState;

const KIND: DocumentKind = DocumentKind::StateData;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/state-data", get(list).post(create).patch(remove_entry))
        .route("/api/state-data/{name}", get(fetch).delete(delete_doc))
        .route(
            "/api/state-data/{name}/transitions",
            get(transitions).post(save_transitions),
        )
        .route(
            "/api/state-data/{name}/transitions/{id}/variables",
            get(variables).post(save_variables),
        )
        .route(
            "/api/state-data/{name}/manager",
            get(manager).post(save_manager),
        )
}

fn load_doc(store: &Store, name: &str) -> Result<StateDocument, ApiError> {
    let value = store.load(KIND, name)?;
    Ok(serde_json::from_value(value)?)
}

fn save_doc(store: &Store, name: &str, doc: &StateDocument) -> Result<(), ApiError> {
    store.save(KIND, name, &serde_json::to_value(doc)?)?;
    Ok(())
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
        "message": format!("State {} created successfully", entry.name),
        "data": entry,
    })))
}

async fn remove_entry(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<Json<Value>, ApiError> {
    state.store.remove_list_entry(KIND, &req.name)?;
    Ok(message(format!(
        "State {} removed from state-data_list.json",
        req.name
    )))
}

async fn fetch(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StateDocument>, ApiError> {
    Ok(Json(load_doc(&state.store, &name)?))
}

async fn delete_doc(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(KIND, &name)?;
    Ok(message(format!("{name}.json deleted successfully")))
}

async fn transitions(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Transition>>, ApiError> {
    Ok(Json(load_doc(&state.store, &name)?.transitions))
}

/// Body is the bare transition array. Stored variable lists survive for
/// transitions the incoming array carries without them.
async fn save_transitions(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(incoming): Json<Vec<Transition>>,
) -> Result<Json<Value>, ApiError> {
    let mut doc = load_doc(&state.store, &name)?;
    doc.replace_transitions(incoming);
    save_doc(&state.store, &name, &doc)?;
    Ok(message(format!("{name} transitions saved successfully")))
}

async fn variables(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, u64)>,
) -> Result<Json<Vec<VariableRow>>, ApiError> {
    let doc = load_doc(&state.store, &name)?;
    let transition = doc
        .transition(id)
        .ok_or_else(|| ApiError::NotFound(format!("no such transition id: {id}")))?;
    Ok(Json(transition.variables.clone()))
}

async fn save_variables(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, u64)>,
    Json(rows): Json<Vec<VariableRow>>,
) -> Result<Json<Value>, ApiError> {
    let mut doc = load_doc(&state.store, &name)?;
    doc.replace_transition_variables(id, rows)?;
    save_doc(&state.store, &name, &doc)?;
    Ok(message(format!(
        "{name} transition {id} variables saved successfully"
    )))
}

async fn manager(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<VariableRow>>, ApiError> {
    Ok(Json(load_doc(&state.store, &name)?.manager))
}

async fn save_manager(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(rows): Json<Vec<VariableRow>>,
) -> Result<Json<Value>, ApiError> {
    let mut doc = load_doc(&state.store, &name)?;
    doc.manager = rows;
    save_doc(&state.store, &name, &doc)?;
    Ok(message(format!("{name} manager saved successfully")))
}
