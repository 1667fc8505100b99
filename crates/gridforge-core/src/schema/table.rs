//! Keyed record tables.
//!
//! A table document pairs an ordered column list with a row list. Every row
//! carries a stable id, a human-readable key (`enum_property`, the stable
//! external reference other documents use), a description, and one typed
//! cell per column. Mutations keep every row consistent with the current
//! column set; `normalize` re-establishes that invariant for documents
//! loaded from disk or import.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::ReferenceCatalog;
use crate::csv;
use crate::errors::{GridforgeError, GridforgeResult};
use crate::field::{Field, FieldType};
use crate::schema::next_id;
use crate::value::TypedValue;

/// One cell: the value plus the column type it was written under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: TypedValue,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl Cell {
    pub fn default_for(ty: &FieldType, catalog: &ReferenceCatalog) -> Self {
        Self {
            value: TypedValue::default_for(ty, catalog),
            ty: ty.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "enum_property", default)]
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data: BTreeMap<String, Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    #[serde(default)]
    pub columns: Vec<Field>,
    #[serde(default)]
    pub rows: Vec<TableRecord>,
    /// Row currently opened for detail viewing. Not persisted.
    #[serde(skip)]
    selected: Option<u64>,
}

impl TableDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-establish the shape invariant after loading: fill missing ids and
    /// keys from row positions, and coerce every cell onto its column's
    /// declared type (missing or malformed cells become defaults).
    pub fn normalize(&mut self, catalog: &ReferenceCatalog) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            if row.id == 0 {
                row.id = index as u64 + 1;
            }
            if row.key.is_empty() {
                row.key = format!("Row{}", index + 1);
            }
            for column in &self.columns {
                let coerced = match row.data.get(&column.name) {
                    Some(cell) => TypedValue::coerce(&cell.value.to_json(), &column.ty, catalog),
                    None => TypedValue::default_for(&column.ty, catalog),
                };
                row.data.insert(
                    column.name.clone(),
                    Cell {
                        value: coerced,
                        ty: column.ty.clone(),
                    },
                );
            }
        }
    }

    /// Append a column and give every row its default value. An empty table
    /// gets one synthesized row so the new column is immediately visible.
    pub fn add_field(
        &mut self,
        doc_name: &str,
        ty: FieldType,
        name: impl Into<String>,
        catalog: &ReferenceCatalog,
    ) -> GridforgeResult<()> {
        let name = name.into();
        if ty.as_str().trim().is_empty() || name.trim().is_empty() {
            return Err(GridforgeError::validation("type and name are required"));
        }
        if self.columns.iter().any(|c| c.name == name) {
            return Err(GridforgeError::validation(format!(
                "column already exists: {name}"
            )));
        }

        let cell = Cell::default_for(&ty, catalog);
        self.columns.push(Field::new(ty, name.clone()));
        if self.rows.is_empty() {
            self.rows.push(TableRecord {
                id: 1,
                key: format!("{doc_name}_00"),
                description: String::new(),
                data: BTreeMap::new(),
            });
        }
        for row in &mut self.rows {
            row.data.insert(name.clone(), cell.clone());
        }
        Ok(())
    }

    /// Remove a column and every row's entry for it. The caller is expected
    /// to have confirmed the removal with the user.
    pub fn remove_field(&mut self, name: &str) -> GridforgeResult<()> {
        let before = self.columns.len();
        self.columns.retain(|c| c.name != name);
        if self.columns.len() == before {
            return Err(GridforgeError::validation(format!(
                "no such column: {name}"
            )));
        }
        for row in &mut self.rows {
            row.data.remove(name);
        }
        Ok(())
    }

    /// Append `count` defaulted records with consecutive ids and
    /// `<name>_NN` keys (1-based, zero-padded to two digits).
    pub fn add_records(
        &mut self,
        doc_name: &str,
        count: usize,
        catalog: &ReferenceCatalog,
    ) -> GridforgeResult<()> {
        if count == 0 {
            return Err(GridforgeError::validation("enter a valid record count"));
        }
        let base_id = self.rows.iter().map(|r| r.id).max().unwrap_or(0);
        for index in 0..count {
            let data = self
                .columns
                .iter()
                .map(|c| (c.name.clone(), Cell::default_for(&c.ty, catalog)))
                .collect();
            self.rows.push(TableRecord {
                id: base_id + index as u64 + 1,
                key: format!("{doc_name}_{:02}", index + 1),
                description: String::new(),
                data,
            });
        }
        Ok(())
    }

    /// Remove a record by id. Clears the detail selection when it pointed
    /// at the removed record. Ids are not compacted.
    pub fn remove_record(&mut self, id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        let removed = self.rows.len() != before;
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    pub fn select_record(&mut self, id: u64) -> GridforgeResult<()> {
        if !self.rows.iter().any(|r| r.id == id) {
            return Err(GridforgeError::invalid_argument(format!(
                "no such record id: {id}"
            )));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn selected_record(&self) -> Option<u64> {
        self.selected
    }

    /// Coerce raw input into one cell.
    pub fn set_cell(
        &mut self,
        row_id: u64,
        column_name: &str,
        raw: &Value,
        catalog: &ReferenceCatalog,
    ) -> GridforgeResult<()> {
        let column = self
            .columns
            .iter()
            .find(|c| c.name == column_name)
            .ok_or_else(|| {
                GridforgeError::invalid_argument(format!("no such column: {column_name}"))
            })?
            .clone();
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == row_id)
            .ok_or_else(|| GridforgeError::invalid_argument(format!("no such record id: {row_id}")))?;
        row.data.insert(
            column.name.clone(),
            Cell {
                value: TypedValue::coerce(raw, &column.ty, catalog),
                ty: column.ty,
            },
        );
        Ok(())
    }

    /// Record keys in declaration order, for reference catalogs.
    pub fn keys(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.key.clone()).collect()
    }

    /// CSV export: `id,enum_property,description` plus one column per field,
    /// every value quoted.
    pub fn to_csv(&self) -> String {
        let mut header = vec![
            "id".to_string(),
            "enum_property".to_string(),
            "description".to_string(),
        ];
        header.extend(self.columns.iter().map(|c| c.name.clone()));

        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut fields = vec![row.id.to_string(), row.key.clone(), row.description.clone()];
                for column in &self.columns {
                    let text = row
                        .data
                        .get(&column.name)
                        .map(|c| c.value.export_text())
                        .unwrap_or_default();
                    fields.push(text);
                }
                fields
            })
            .collect();
        csv::encode(&header, &rows)
    }

    /// CSV import: replaces all rows. Rows are re-identified `1..=N` in file
    /// order; a missing key becomes `RowN`; every cell runs through
    /// coercion so malformed input lands on defaults.
    pub fn import_csv(&mut self, text: &str, catalog: &ReferenceCatalog) -> GridforgeResult<()> {
        let (_, records) = csv::parse_records(text)?;
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let key = record
                .get("enum_property")
                .filter(|k| !k.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("Row{}", index + 1));
            let description = record.get("description").cloned().unwrap_or_default();
            let data = self
                .columns
                .iter()
                .map(|column| {
                    let raw = record.get(&column.name).map(String::as_str).unwrap_or("");
                    (
                        column.name.clone(),
                        Cell {
                            value: TypedValue::coerce_text(raw, &column.ty, catalog),
                            ty: column.ty.clone(),
                        },
                    )
                })
                .collect();
            rows.push(TableRecord {
                id: index as u64 + 1,
                key,
                description,
                data,
            });
        }
        self.rows = rows;
        self.selected = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> ReferenceCatalog {
        let mut c = ReferenceCatalog::new();
        c.insert("MoveKind", vec!["Idle".to_string(), "Run".to_string()]);
        c
    }

    #[test]
    fn add_field_defaults_every_row() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("Weapon", FieldType::Int, "Damage", &c).unwrap();
        doc.add_records("Weapon", 2, &c).unwrap();
        doc.set_cell(1, "Damage", &json!(5), &c).unwrap();

        doc.add_field("Weapon", FieldType::Str, "Name", &c).unwrap();
        for row in &doc.rows {
            assert_eq!(
                row.data.get("Name").map(|cell| &cell.value),
                Some(&TypedValue::Str(String::new()))
            );
        }
        assert_eq!(doc.rows[0].data["Damage"].value, TypedValue::Int(5));
    }

    #[test]
    fn add_field_synthesizes_first_record() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("Weapon", FieldType::Int, "Damage", &c).unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].id, 1);
        assert_eq!(doc.rows[0].key, "Weapon_00");
        assert_eq!(doc.rows[0].data["Damage"].value, TypedValue::Int(0));
    }

    #[test]
    fn duplicate_and_blank_columns_rejected() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Int, "Damage", &c).unwrap();
        assert!(doc.add_field("W", FieldType::Float, "Damage", &c).is_err());
        assert!(doc.add_field("W", FieldType::Int, " ", &c).is_err());
        assert_eq!(doc.columns.len(), 1);
    }

    #[test]
    fn remove_field_strips_rows() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Int, "Damage", &c).unwrap();
        doc.add_field("W", FieldType::Str, "Name", &c).unwrap();
        doc.remove_field("Damage").unwrap();
        assert!(doc.remove_field("Damage").is_err());
        assert!(doc.rows.iter().all(|r| !r.data.contains_key("Damage")));
        assert!(doc.rows.iter().all(|r| r.data.contains_key("Name")));
    }

    #[test]
    fn batch_records_get_consecutive_ids_and_padded_keys() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("Item", FieldType::Int, "Cost", &c).unwrap();
        doc.add_records("Item", 3, &c).unwrap();
        let ids: Vec<u64> = doc.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(doc.rows[1].key, "Item_01");
        assert_eq!(doc.rows[3].key, "Item_03");
    }

    #[test]
    fn removing_selected_record_clears_selection() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Int, "Damage", &c).unwrap();
        doc.add_records("W", 1, &c).unwrap();
        doc.select_record(2).unwrap();
        assert!(doc.remove_record(2));
        assert_eq!(doc.selected_record(), None);
        // ids are not compacted
        assert_eq!(doc.rows[0].id, 1);
    }

    #[test]
    fn normalize_repairs_loaded_documents() {
        let c = catalog();
        let mut doc: TableDocument = serde_json::from_value(json!({
            "columns": [
                {"type": "int", "name": "Damage"},
                {"type": "Vector2", "name": "Knockback"},
                {"type": "MoveKind", "name": "Move"}
            ],
            "rows": [
                {"enum_property": "", "data": {
                    "Damage": {"value": "7", "type": "int"},
                    "Knockback": {"value": "oops", "type": "Vector2"}
                }}
            ]
        }))
        .unwrap();
        doc.normalize(&c);

        let row = &doc.rows[0];
        assert_eq!(row.id, 1);
        assert_eq!(row.key, "Row1");
        assert_eq!(row.data["Damage"].value, TypedValue::Int(7));
        assert_eq!(row.data["Knockback"].value, TypedValue::Vector2([0.0, 0.0]));
        assert_eq!(
            row.data["Move"].value,
            TypedValue::Reference("MoveKindID.Idle".to_string())
        );
    }

    #[test]
    fn csv_round_trip_preserves_cell_values() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Int, "Damage", &c).unwrap();
        doc.add_field("W", FieldType::Vector2, "Knockback", &c).unwrap();
        doc.add_field("W", FieldType::parse("MoveKind"), "Move", &c).unwrap();
        doc.set_cell(1, "Damage", &json!(12), &c).unwrap();
        doc.set_cell(1, "Knockback", &json!([1.5, -2.0]), &c).unwrap();
        doc.set_cell(1, "Move", &json!("MoveKindID.Run"), &c).unwrap();

        let text = doc.to_csv();
        let mut imported = TableDocument {
            columns: doc.columns.clone(),
            ..TableDocument::new()
        };
        imported.import_csv(&text, &c).unwrap();
        assert_eq!(imported.rows[0].data, doc.rows[0].data);
        assert_eq!(imported.rows[0].key, doc.rows[0].key);
    }

    #[test]
    fn csv_import_defaults_malformed_vectors() {
        let c = catalog();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Vector2, "Knockback", &c).unwrap();

        doc.import_csv(
            "id,enum_property,description,Knockback\n\"1\",\"a\",\"\",\"[1,2]\"\n\"2\",\"b\",\"\",\"bad\"\n",
            &c,
        )
        .unwrap();
        assert_eq!(
            doc.rows[0].data["Knockback"].value,
            TypedValue::Vector2([1.0, 2.0])
        );
        assert_eq!(
            doc.rows[1].data["Knockback"].value,
            TypedValue::Vector2([0.0, 0.0])
        );
    }
}
