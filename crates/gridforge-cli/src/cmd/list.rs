use anyhow::Result;
use serde::Serialize;

use gridforge_store::DocumentKind;

use crate::cmd::{open_store, parse_kind};
use crate::output;

#[derive(Debug, Serialize)]
pub struct DocumentInfo {
    pub kind: String,
    pub id: u64,
    pub name: String,
    #[serde(rename = "rowId", skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(rename = "colId", skip_serializing_if = "Option::is_none")]
    pub col_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListOut {
    pub documents: Vec<DocumentInfo>,
}

pub fn run(store_root: &str, kind: Option<&str>) -> Result<()> {
    let store = open_store(store_root)?;

    let kinds: Vec<DocumentKind> = match kind {
        Some(kind) => vec![parse_kind(kind)?],
        None => DocumentKind::ALL.to_vec(),
    };

    let mut documents = Vec::new();
    for kind in kinds {
        for entry in store.list(kind)? {
            documents.push(DocumentInfo {
                kind: kind.dir_name().to_string(),
                id: entry.id,
                name: entry.name,
                row_id: entry.row_id,
                col_id: entry.col_id,
            });
        }
    }

    output::print(&ListOut { documents })
}
