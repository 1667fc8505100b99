use anyhow::Result;
use serde::Serialize;

use gridforge_core::schema::class::ClassDocument;
use gridforge_core::schema::enums::EnumDocument;
use gridforge_core::schema::matrix::MatrixDocument;
use gridforge_core::schema::state::StateDocument;
use gridforge_core::schema::table::TableDocument;
use gridforge_store::{DocumentKind, Store};

use crate::cmd::open_store;
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub fn run(store_root: &str) -> Result<()> {
    let store = open_store(store_root)?;
    let mut checks = Vec::new();

    let findings = store.verify()?;
    checks.push(Check {
        name: "index-consistency".to_string(),
        ok: findings.is_empty(),
        detail: if findings.is_empty() {
            "every index entry has a document and every directory is indexed".to_string()
        } else {
            findings.join("; ")
        },
    });

    let broken = unparsable_documents(&store)?;
    checks.push(Check {
        name: "documents-parse".to_string(),
        ok: broken.is_empty(),
        detail: if broken.is_empty() {
            "every document parses as its kind".to_string()
        } else {
            broken.join("; ")
        },
    });

    let dangling = dangling_references(&store)?;
    checks.push(Check {
        name: "reference-targets".to_string(),
        ok: dangling.is_empty(),
        detail: if dangling.is_empty() {
            "every reference-typed column names a known catalog entry".to_string()
        } else {
            dangling.join("; ")
        },
    });

    let ok = checks.iter().all(|c| c.ok);
    if output::is_json() {
        output::print(&DoctorOut { ok, checks })?;
    } else {
        for check in &checks {
            output::status_line(check.ok, &format!("{}: {}", check.name, check.detail))?;
        }
    }
    Ok(())
}

fn unparsable_documents(store: &Store) -> Result<Vec<String>> {
    let mut broken = Vec::new();
    for kind in DocumentKind::ALL {
        for entry in store.list(kind)? {
            let Ok(value) = store.load(kind, &entry.name) else {
                continue; // verify already reports missing files
            };
            let parses = match kind {
                DocumentKind::Enum => serde_json::from_value::<EnumDocument>(value).is_ok(),
                DocumentKind::ClassData => serde_json::from_value::<ClassDocument>(value).is_ok(),
                DocumentKind::ClassDataId => serde_json::from_value::<TableDocument>(value).is_ok(),
                DocumentKind::ClassDataMatrixId => {
                    serde_json::from_value::<MatrixDocument>(value).is_ok()
                }
                DocumentKind::StateData => serde_json::from_value::<StateDocument>(value).is_ok(),
            };
            if !parses {
                broken.push(format!("{}/{}", kind.dir_name(), entry.name));
            }
        }
    }
    Ok(broken)
}

/// Deleting a document does not cascade into referencing columns; this
/// check is where those stale references surface.
fn dangling_references(store: &Store) -> Result<Vec<String>> {
    let catalog = store.reference_catalog()?;
    let mut dangling = Vec::new();

    for entry in store.list(DocumentKind::ClassDataId)? {
        let Ok(value) = store.load(DocumentKind::ClassDataId, &entry.name) else {
            continue;
        };
        let Ok(doc) = serde_json::from_value::<TableDocument>(value) else {
            continue;
        };
        for column in &doc.columns {
            if let Some(target) = column.ty.reference_target() {
                if !catalog.contains_type(target) {
                    dangling.push(format!(
                        "class-data-id/{}: column {} references unknown {}",
                        entry.name, column.name, target
                    ));
                }
            }
        }
    }

    for entry in store.list(DocumentKind::ClassDataMatrixId)? {
        let Ok(value) = store.load(DocumentKind::ClassDataMatrixId, &entry.name) else {
            continue;
        };
        let Ok(doc) = serde_json::from_value::<MatrixDocument>(value) else {
            continue;
        };
        for axis in [&doc.row_id, &doc.col_id] {
            if !axis.is_empty() && !catalog.contains_type(axis) {
                dangling.push(format!(
                    "class-data-matrix-id/{}: axis references unknown {}",
                    entry.name, axis
                ));
            }
        }
        for field in &doc.fields {
            if let Some(target) = field.ty.reference_target() {
                if !catalog.contains_type(target) {
                    dangling.push(format!(
                        "class-data-matrix-id/{}: field {} references unknown {}",
                        entry.name, field.name, target
                    ));
                }
            }
        }
    }

    Ok(dangling)
}
