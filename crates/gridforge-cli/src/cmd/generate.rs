use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use gridforge_core::generate::{binary, csharp};
use gridforge_core::schema::class::ClassDocument;
use gridforge_core::schema::enums::EnumDocument;
use gridforge_core::schema::matrix::MatrixDocument;
use gridforge_core::schema::state::StateDocument;
use gridforge_core::schema::table::TableDocument;
use gridforge_store::{DocumentKind, Store};

use crate::cmd::open_store;
use crate::output;

#[derive(Debug, Serialize)]
pub struct GenerateOut {
    pub target: String,
    pub artifacts: Vec<String>,
}

pub fn run(store_root: &str, target: &str, name: Option<&str>) -> Result<()> {
    let store = open_store(store_root)?;

    let artifacts = match target {
        "enum" => vec![gen_enum(&store, required(name)?)?],
        "class" => vec![gen_class(&store, required(name)?)?],
        "table-id" => vec![gen_table_id(&store, required(name)?)?],
        "table-binary" => vec![gen_table_binary(&store, required(name)?)?],
        "matrix-header" => vec![gen_matrix_header(&store, required(name)?)?],
        "matrix-binary" => vec![gen_matrix_binary(&store, required(name)?)?],
        "state" => vec![gen_state(&store, required(name)?)?],
        "matrix-table-id" => vec![gen_matrix_table_id(&store)?],
        "all" => gen_all(&store)?,
        other => return Err(anyhow!("unknown generate target: {other}")),
    };

    output::print(&GenerateOut {
        target: target.to_string(),
        artifacts,
    })
}

fn required(name: Option<&str>) -> Result<&str> {
    name.ok_or_else(|| anyhow!("this target requires a document name"))
}

fn gen_enum(store: &Store, name: &str) -> Result<String> {
    let doc: EnumDocument = serde_json::from_value(store.load(DocumentKind::Enum, name)?)?;
    let source = csharp::enum_source(name, &doc);
    let path = store.write_artifact(
        DocumentKind::Enum,
        name,
        &format!("{name}.cs"),
        source.as_bytes(),
    )?;
    Ok(path.display().to_string())
}

fn gen_class(store: &Store, name: &str) -> Result<String> {
    let doc: ClassDocument = serde_json::from_value(store.load(DocumentKind::ClassData, name)?)?;
    let source = csharp::class_source(name, &doc.rows);
    let path = store.write_artifact(
        DocumentKind::ClassData,
        name,
        &format!("{name}.cs"),
        source.as_bytes(),
    )?;
    Ok(path.display().to_string())
}

fn load_table(store: &Store, name: &str) -> Result<TableDocument> {
    let mut doc: TableDocument =
        serde_json::from_value(store.load(DocumentKind::ClassDataId, name)?)?;
    doc.normalize(&store.reference_catalog()?);
    Ok(doc)
}

fn gen_table_id(store: &Store, name: &str) -> Result<String> {
    let doc = load_table(store, name)?;
    let source = csharp::table_id_enum_source(name, &doc);
    let path = store.write_artifact(
        DocumentKind::ClassDataId,
        name,
        &format!("{name}ID.cs"),
        source.as_bytes(),
    )?;
    Ok(path.display().to_string())
}

fn gen_table_binary(store: &Store, name: &str) -> Result<String> {
    let doc = load_table(store, name)?;
    let bytes = binary::table_binary(&doc)?;
    let path = store.write_artifact(
        DocumentKind::ClassDataId,
        name,
        &format!("{name}.bytes"),
        &bytes,
    )?;
    Ok(path.display().to_string())
}

fn load_matrix(store: &Store, name: &str) -> Result<(MatrixDocument, Vec<String>, Vec<String>)> {
    let mut doc: MatrixDocument =
        serde_json::from_value(store.load(DocumentKind::ClassDataMatrixId, name)?)?;
    let catalog = store.reference_catalog()?;
    let row_keys = doc.row_keys(&catalog).to_vec();
    let col_keys = doc.col_keys(&catalog).to_vec();
    doc.reconcile_keys(&row_keys, &col_keys, &catalog);
    Ok((doc, row_keys, col_keys))
}

fn gen_matrix_header(store: &Store, name: &str) -> Result<String> {
    let (doc, _, _) = load_matrix(store, name)?;
    let source = csharp::matrix_header_source(name, &doc);
    let path = store.write_artifact(
        DocumentKind::ClassDataMatrixId,
        name,
        &format!("{name}.cs"),
        source.as_bytes(),
    )?;
    Ok(path.display().to_string())
}

fn gen_matrix_binary(store: &Store, name: &str) -> Result<String> {
    let (doc, row_keys, col_keys) = load_matrix(store, name)?;
    let bytes = binary::matrix_binary(&doc, &row_keys, &col_keys)?;
    let path = store.write_artifact(
        DocumentKind::ClassDataMatrixId,
        name,
        &format!("{name}.bytes"),
        &bytes,
    )?;
    Ok(path.display().to_string())
}

fn gen_state(store: &Store, name: &str) -> Result<String> {
    let doc: StateDocument = serde_json::from_value(store.load(DocumentKind::StateData, name)?)?;
    let source = csharp::state_source(name, &doc);
    let path = store.write_artifact(
        DocumentKind::StateData,
        name,
        &format!("{name}.cs"),
        source.as_bytes(),
    )?;
    Ok(path.display().to_string())
}

fn gen_matrix_table_id(store: &Store) -> Result<String> {
    let names: Vec<String> = store
        .list(DocumentKind::ClassDataMatrixId)?
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    let source = csharp::matrix_table_id_source(&names);
    let path = store.write_index_artifact(
        DocumentKind::ClassDataMatrixId,
        "MatrixTableID.cs",
        source.as_bytes(),
    )?;
    Ok(path.display().to_string())
}

/// Regenerate every artifact in the store.
fn gen_all(store: &Store) -> Result<Vec<String>> {
    let enums = store.list(DocumentKind::Enum)?;
    let classes = store.list(DocumentKind::ClassData)?;
    let tables = store.list(DocumentKind::ClassDataId)?;
    let matrices = store.list(DocumentKind::ClassDataMatrixId)?;
    let states = store.list(DocumentKind::StateData)?;

    let total = enums.len() + classes.len() + tables.len() * 2 + matrices.len() * 2 + states.len() + 1;
    let pb = ProgressBar::new(total as u64);
    pb.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")?);

    let mut artifacts = Vec::with_capacity(total);
    let mut step = |result: Result<String>, pb: &ProgressBar| -> Result<()> {
        let path = result?;
        pb.set_message(path.clone());
        pb.inc(1);
        artifacts.push(path);
        Ok(())
    };

    for entry in &enums {
        step(gen_enum(store, &entry.name), &pb)?;
    }
    for entry in &classes {
        step(gen_class(store, &entry.name), &pb)?;
    }
    for entry in &tables {
        step(gen_table_id(store, &entry.name), &pb)?;
        step(gen_table_binary(store, &entry.name), &pb)?;
    }
    for entry in &matrices {
        step(gen_matrix_header(store, &entry.name), &pb)?;
        step(gen_matrix_binary(store, &entry.name), &pb)?;
    }
    for entry in &states {
        step(gen_state(store, &entry.name), &pb)?;
    }
    step(gen_matrix_table_id(store), &pb)?;

    pb.finish_and_clear();
    Ok(artifacts)
}
