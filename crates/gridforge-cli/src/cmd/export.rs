use std::fs;

use anyhow::{anyhow, Result};
use serde::Serialize;

use gridforge_core::schema::matrix::MatrixDocument;
use gridforge_core::schema::table::TableDocument;
use gridforge_store::DocumentKind;

use crate::cmd::{open_store, parse_kind};
use crate::output;

#[derive(Debug, Serialize)]
pub struct ExportOut {
    pub kind: String,
    pub name: String,
    pub rows: usize,
    pub wrote_to: Option<String>,
}

pub fn run(store_root: &str, kind: &str, name: &str, out: Option<&str>) -> Result<()> {
    let store = open_store(store_root)?;
    let catalog = store.reference_catalog()?;

    let (text, rows) = match parse_kind(kind)? {
        DocumentKind::ClassDataId => {
            let mut doc: TableDocument =
                serde_json::from_value(store.load(DocumentKind::ClassDataId, name)?)?;
            doc.normalize(&catalog);
            let rows = doc.rows.len();
            (doc.to_csv(), rows)
        }
        DocumentKind::ClassDataMatrixId => {
            let mut doc: MatrixDocument =
                serde_json::from_value(store.load(DocumentKind::ClassDataMatrixId, name)?)?;
            let row_keys = doc.row_keys(&catalog).to_vec();
            let col_keys = doc.col_keys(&catalog).to_vec();
            doc.reconcile_keys(&row_keys, &col_keys, &catalog);
            (doc.to_csv(&row_keys, &col_keys), row_keys.len())
        }
        other => {
            return Err(anyhow!(
                "{} does not support CSV export",
                other.dir_name()
            ))
        }
    };

    match out {
        Some(path) => {
            fs::write(path, &text)?;
            output::print(&ExportOut {
                kind: kind.to_string(),
                name: name.to_string(),
                rows,
                wrote_to: Some(path.to_string()),
            })
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
