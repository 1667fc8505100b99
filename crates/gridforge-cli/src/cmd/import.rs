use std::fs;

use anyhow::{anyhow, Result};
use serde::Serialize;

use gridforge_core::schema::matrix::MatrixDocument;
use gridforge_core::schema::table::TableDocument;
use gridforge_store::DocumentKind;

use crate::cmd::{open_store, parse_kind};
use crate::output;

#[derive(Debug, Serialize)]
pub struct ImportOut {
    pub kind: String,
    pub name: String,
    pub rows: usize,
}

pub fn run(store_root: &str, kind: &str, name: &str, file: &str) -> Result<()> {
    let store = open_store(store_root)?;
    let catalog = store.reference_catalog()?;
    let text = fs::read_to_string(file)?;

    let rows = match parse_kind(kind)? {
        DocumentKind::ClassDataId => {
            let mut doc: TableDocument =
                serde_json::from_value(store.load(DocumentKind::ClassDataId, name)?)?;
            doc.import_csv(&text, &catalog)?;
            let rows = doc.rows.len();
            store.save(DocumentKind::ClassDataId, name, &serde_json::to_value(&doc)?)?;
            rows
        }
        DocumentKind::ClassDataMatrixId => {
            let mut doc: MatrixDocument =
                serde_json::from_value(store.load(DocumentKind::ClassDataMatrixId, name)?)?;
            let row_keys = doc.row_keys(&catalog).to_vec();
            let col_keys = doc.col_keys(&catalog).to_vec();
            doc.reconcile_keys(&row_keys, &col_keys, &catalog);
            doc.import_csv(&text, &row_keys, &col_keys, &catalog)?;
            store.save(
                DocumentKind::ClassDataMatrixId,
                name,
                &serde_json::to_value(&doc)?,
            )?;
            row_keys.len()
        }
        other => {
            return Err(anyhow!(
                "{} does not support CSV import",
                other.dir_name()
            ))
        }
    };

    output::print(&ImportOut {
        kind: kind.to_string(),
        name: name.to_string(),
        rows,
    })
}
