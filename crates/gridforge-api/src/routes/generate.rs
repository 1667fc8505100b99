//! Artifact generation endpoints.
//!
//! Each endpoint loads the stored document (the editors save before they
//! generate), runs the matching pure generator from `gridforge_core`, and
//! places the artifact next to its source document. Batch endpoints sweep
//! every matrix document.

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use gridforge_core::generate::{binary, csharp};
use gridforge_core::schema::class::ClassDocument;
use gridforge_core::schema::enums::EnumDocument;
use gridforge_core::schema::matrix::MatrixDocument;
use gridforge_core::schema::state::StateDocument;
use gridforge_core::schema::table::TableDocument;
use gridforge_store::{DocumentKind, Store};

use crate::error::ApiError;
use crate::routes::message;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/generate-enum/{name}", post(gen_enum))
        .route("/api/generate-class/{name}", post(gen_class))
        .route("/api/generate-class-data-id/{name}", post(gen_table_id))
        .route("/api/generate-binary/{name}", post(gen_table_binary))
        .route(
            "/api/generate-class-data-matrix-id/{name}",
            post(gen_matrix_header),
        )
        .route("/api/generate-binary-matrix/{name}", post(gen_matrix_binary))
        .route(
            "/api/generate-all-binary-matrix",
            post(gen_all_matrix_binaries),
        )
        .route(
            "/api/generate-all-cs-matrix-header",
            post(gen_all_matrix_headers),
        )
        .route("/api/generate-matrix-table-id", post(gen_matrix_table_id))
        .route("/api/generate-state/{name}", post(gen_state))
}

async fn gen_enum(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc: EnumDocument = serde_json::from_value(state.store.load(DocumentKind::Enum, &name)?)?;
    let source = csharp::enum_source(&name, &doc);
    state
        .store
        .write_artifact(DocumentKind::Enum, &name, &format!("{name}.cs"), source.as_bytes())?;
    Ok(message(format!("{name}.cs generated successfully")))
}

async fn gen_class(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc: ClassDocument =
        serde_json::from_value(state.store.load(DocumentKind::ClassData, &name)?)?;
    let source = csharp::class_source(&name, &doc.rows);
    state.store.write_artifact(
        DocumentKind::ClassData,
        &name,
        &format!("{name}.cs"),
        source.as_bytes(),
    )?;
    Ok(message(format!("{name}.cs generated successfully")))
}

fn load_table(store: &Store, name: &str) -> Result<TableDocument, ApiError> {
    let mut doc: TableDocument =
        serde_json::from_value(store.load(DocumentKind::ClassDataId, name)?)?;
    doc.normalize(&store.reference_catalog()?);
    Ok(doc)
}

async fn gen_table_id(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc = load_table(&state.store, &name)?;
    let source = csharp::table_id_enum_source(&name, &doc);
    state.store.write_artifact(
        DocumentKind::ClassDataId,
        &name,
        &format!("{name}ID.cs"),
        source.as_bytes(),
    )?;
    Ok(message(format!("{name}ID.cs generated successfully")))
}

async fn gen_table_binary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc = load_table(&state.store, &name)?;
    let bytes = binary::table_binary(&doc)?;
    state.store.write_artifact(
        DocumentKind::ClassDataId,
        &name,
        &format!("{name}.bytes"),
        &bytes,
    )?;
    Ok(message(format!("{name}.bytes generated successfully")))
}

/// Matrix documents are reconciled against the current axis catalogs before
/// generation, so the binary encoder always sees the full key product.
fn load_matrix(store: &Store, name: &str) -> Result<(MatrixDocument, Vec<String>, Vec<String>), ApiError> {
    let mut doc: MatrixDocument =
        serde_json::from_value(store.load(DocumentKind::ClassDataMatrixId, name)?)?;
    let catalog = store.reference_catalog()?;
    let row_keys = doc.row_keys(&catalog).to_vec();
    let col_keys = doc.col_keys(&catalog).to_vec();
    doc.reconcile_keys(&row_keys, &col_keys, &catalog);
    Ok((doc, row_keys, col_keys))
}

async fn gen_matrix_header(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (doc, _, _) = load_matrix(&state.store, &name)?;
    let source = csharp::matrix_header_source(&name, &doc);
    state.store.write_artifact(
        DocumentKind::ClassDataMatrixId,
        &name,
        &format!("{name}.cs"),
        source.as_bytes(),
    )?;
    Ok(message(format!("{name}.cs generated successfully")))
}

async fn gen_matrix_binary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (doc, row_keys, col_keys) = load_matrix(&state.store, &name)?;
    let bytes = binary::matrix_binary(&doc, &row_keys, &col_keys)?;
    state.store.write_artifact(
        DocumentKind::ClassDataMatrixId,
        &name,
        &format!("{name}.bytes"),
        &bytes,
    )?;
    Ok(message(format!("{name}.bytes generated successfully")))
}

async fn gen_all_matrix_binaries(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let entries = state.store.list(DocumentKind::ClassDataMatrixId)?;
    for entry in &entries {
        let (doc, row_keys, col_keys) = load_matrix(&state.store, &entry.name)?;
        let bytes = binary::matrix_binary(&doc, &row_keys, &col_keys)?;
        state.store.write_artifact(
            DocumentKind::ClassDataMatrixId,
            &entry.name,
            &format!("{}.bytes", entry.name),
            &bytes,
        )?;
    }
    Ok(message(format!(
        "{} matrix binaries generated successfully",
        entries.len()
    )))
}

async fn gen_all_matrix_headers(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let entries = state.store.list(DocumentKind::ClassDataMatrixId)?;
    for entry in &entries {
        let (doc, _, _) = load_matrix(&state.store, &entry.name)?;
        let source = csharp::matrix_header_source(&entry.name, &doc);
        state.store.write_artifact(
            DocumentKind::ClassDataMatrixId,
            &entry.name,
            &format!("{}.cs", entry.name),
            source.as_bytes(),
        )?;
    }
    Ok(message(format!(
        "{} matrix headers generated successfully",
        entries.len()
    )))
}

async fn gen_matrix_table_id(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let names: Vec<String> = state
        .store
        .list(DocumentKind::ClassDataMatrixId)?
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    let source = csharp::matrix_table_id_source(&names);
    state.store.write_index_artifact(
        DocumentKind::ClassDataMatrixId,
        "MatrixTableID.cs",
        source.as_bytes(),
    )?;
    Ok(message("MatrixTableID.cs generated successfully"))
}

async fn gen_state(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc: StateDocument =
        serde_json::from_value(state.store.load(DocumentKind::StateData, &name)?)?;
    let source = csharp::state_source(&name, &doc);
    state.store.write_artifact(
        DocumentKind::StateData,
        &name,
        &format!("{name}.cs"),
        source.as_bytes(),
    )?;
    Ok(message(format!("{name}.cs generated successfully")))
}
