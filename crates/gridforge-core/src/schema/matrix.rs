//! Matrix tables.
//!
//! A matrix document addresses its records by a pair of enum-derived keys
//! instead of a single one: `rowId` and `colId` name the enum documents
//! whose member lists span the row and column axes. Each `(rowKey, colKey)`
//! cell holds one typed value per declared field.
//!
//! The axes live in other documents, so the cell map can drift whenever
//! those enums change. [`MatrixDocument::reconcile_keys`] is the repair
//! operation: eager, full reconciliation that leaves the cell map in exact
//! bijection with `row_keys × col_keys`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::ReferenceCatalog;
use crate::csv;
use crate::errors::{GridforgeError, GridforgeResult};
use crate::field::{Field, FieldType};
use crate::value::TypedValue;

/// field name → value, for one `(rowKey, colKey)` cell.
pub type MatrixCell = BTreeMap<String, TypedValue>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixDocument {
    #[serde(rename = "rowId", default)]
    pub row_id: String,
    #[serde(rename = "colId", default)]
    pub col_id: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// rowKey → colKey → cell.
    #[serde(default)]
    pub data: BTreeMap<String, BTreeMap<String, MatrixCell>>,
}

impl MatrixDocument {
    pub fn new(row_id: impl Into<String>, col_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            col_id: col_id.into(),
            ..Self::default()
        }
    }

    /// Row keys from the catalog's view of the row axis enum.
    pub fn row_keys<'a>(&self, catalog: &'a ReferenceCatalog) -> &'a [String] {
        catalog.members(&self.row_id)
    }

    /// Column keys from the catalog's view of the column axis enum.
    pub fn col_keys<'a>(&self, catalog: &'a ReferenceCatalog) -> &'a [String] {
        catalog.members(&self.col_id)
    }

    /// Bring the cell map into exact bijection with `row_keys × col_keys`:
    /// missing pairs and missing fields gain defaults, stale rows and cells
    /// are deleted.
    pub fn reconcile_keys(
        &mut self,
        row_keys: &[String],
        col_keys: &[String],
        catalog: &ReferenceCatalog,
    ) {
        for row_key in row_keys {
            let row = self.data.entry(row_key.clone()).or_default();
            for col_key in col_keys {
                let cell = row.entry(col_key.clone()).or_default();
                for field in &self.fields {
                    cell.entry(field.name.clone())
                        .or_insert_with(|| TypedValue::default_for(&field.ty, catalog));
                }
            }
        }
        self.data.retain(|row_key, _| row_keys.contains(row_key));
        for row in self.data.values_mut() {
            row.retain(|col_key, _| col_keys.contains(col_key));
        }
    }

    /// Append a field and give every cell its default value.
    pub fn add_field(
        &mut self,
        ty: FieldType,
        name: impl Into<String>,
        description: impl Into<String>,
        catalog: &ReferenceCatalog,
    ) -> GridforgeResult<()> {
        let name = name.into();
        if ty.as_str().trim().is_empty() || name.trim().is_empty() {
            return Err(GridforgeError::validation("type and name are required"));
        }
        if self.fields.iter().any(|f| f.name == name) {
            return Err(GridforgeError::validation(format!(
                "field already exists: {name}"
            )));
        }
        let default = TypedValue::default_for(&ty, catalog);
        self.fields
            .push(Field::new(ty, name.clone()).with_description(description));
        for row in self.data.values_mut() {
            for cell in row.values_mut() {
                cell.insert(name.clone(), default.clone());
            }
        }
        Ok(())
    }

    /// Remove a field from the declaration list and from every cell.
    pub fn remove_field(&mut self, name: &str) -> GridforgeResult<()> {
        let before = self.fields.len();
        self.fields.retain(|f| f.name != name);
        if self.fields.len() == before {
            return Err(GridforgeError::validation(format!("no such field: {name}")));
        }
        for row in self.data.values_mut() {
            for cell in row.values_mut() {
                cell.remove(name);
            }
        }
        Ok(())
    }

    /// Replace one cell from raw per-field input. Fields absent from the
    /// input land on their defaults; the addressed pair must exist.
    pub fn set_cell(
        &mut self,
        row_key: &str,
        col_key: &str,
        raw: &BTreeMap<String, Value>,
        catalog: &ReferenceCatalog,
    ) -> GridforgeResult<()> {
        let cell: MatrixCell = self
            .fields
            .iter()
            .map(|field| {
                let value = match raw.get(&field.name) {
                    Some(v) => TypedValue::coerce(v, &field.ty, catalog),
                    None => TypedValue::default_for(&field.ty, catalog),
                };
                (field.name.clone(), value)
            })
            .collect();
        let row = self.data.get_mut(row_key).ok_or_else(|| {
            GridforgeError::invalid_argument(format!("unknown row key: {row_key}"))
        })?;
        let slot = row.get_mut(col_key).ok_or_else(|| {
            GridforgeError::invalid_argument(format!("unknown column key: {col_key}"))
        })?;
        *slot = cell;
        Ok(())
    }

    /// CSV export: `rowKey` plus one column per column key; each cell is its
    /// JSON object text, quoted.
    pub fn to_csv(&self, row_keys: &[String], col_keys: &[String]) -> String {
        let mut header = vec!["rowKey".to_string()];
        header.extend(col_keys.iter().cloned());

        let rows: Vec<Vec<String>> = row_keys
            .iter()
            .map(|row_key| {
                let mut fields = vec![row_key.clone()];
                for col_key in col_keys {
                    let cell = self
                        .data
                        .get(row_key)
                        .and_then(|row| row.get(col_key));
                    let json: BTreeMap<&str, Value> = cell
                        .map(|c| {
                            c.iter()
                                .map(|(name, value)| (name.as_str(), value.to_json()))
                                .collect()
                        })
                        .unwrap_or_default();
                    fields.push(serde_json::to_string(&json).unwrap_or_else(|_| "{}".to_string()));
                }
                fields
            })
            .collect();
        csv::encode(&header, &rows)
    }

    /// CSV import: rows whose `rowKey` is currently known are applied; a
    /// cell that fails to parse as a JSON object resets wholly to defaults;
    /// individual field values run through coercion.
    pub fn import_csv(
        &mut self,
        text: &str,
        row_keys: &[String],
        col_keys: &[String],
        catalog: &ReferenceCatalog,
    ) -> GridforgeResult<()> {
        let (_, records) = csv::parse_records(text)?;
        for record in records {
            let Some(row_key) = record.get("rowKey").filter(|k| row_keys.contains(*k)) else {
                continue;
            };
            for col_key in col_keys {
                let parsed: Option<BTreeMap<String, Value>> = record
                    .get(col_key)
                    .and_then(|raw| serde_json::from_str(raw).ok());
                let cell: MatrixCell = self
                    .fields
                    .iter()
                    .map(|field| {
                        let value = parsed
                            .as_ref()
                            .and_then(|p| p.get(&field.name))
                            .map(|v| TypedValue::coerce(v, &field.ty, catalog))
                            .unwrap_or_else(|| TypedValue::default_for(&field.ty, catalog));
                        (field.name.clone(), value)
                    })
                    .collect();
                self.data
                    .entry(row_key.clone())
                    .or_default()
                    .insert(col_key.clone(), cell);
            }
        }
        Ok(())
    }
}
