//! Class layout documents.
//!
//! A class document is an ordered list of member declarations
//! `{id, type, name, description, arraySize}` describing a generated class.
//! `arraySize` encodes the container: `-1` list, `0` scalar, `n > 0` fixed
//! array. The same row shape is reused by state machines for transition,
//! manager, and base variable lists.

use serde::{Deserialize, Serialize};

use crate::errors::{GridforgeError, GridforgeResult};
use crate::field::FieldType;
use crate::schema::next_id;

/// One declared member / variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRow {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "arraySize", default)]
    pub array_size: i64,
}

/// Validate the shared add-row rules for variable lists.
pub fn validate_variable(ty: &FieldType, name: &str, array_size: i64) -> GridforgeResult<()> {
    if ty.as_str().trim().is_empty() || name.trim().is_empty() {
        return Err(GridforgeError::validation("type and name are required"));
    }
    if array_size < -1 {
        return Err(GridforgeError::validation(
            "arraySize must be -1 (list), 0 (single), or positive (array)",
        ));
    }
    Ok(())
}

/// Append a validated row to a variable list, assigning the next id.
pub fn push_variable(
    rows: &mut Vec<VariableRow>,
    ty: FieldType,
    name: impl Into<String>,
    description: impl Into<String>,
    array_size: i64,
) -> GridforgeResult<&VariableRow> {
    let name = name.into();
    validate_variable(&ty, &name, array_size)?;
    let id = next_id(rows.iter().map(|r| r.id));
    rows.push(VariableRow {
        id,
        ty,
        name,
        description: description.into(),
        array_size,
    });
    Ok(rows.last().expect("row just pushed"))
}

/// The document is a bare JSON array of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassDocument {
    pub rows: Vec<VariableRow>,
}

impl ClassDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(
        &mut self,
        ty: FieldType,
        name: impl Into<String>,
        description: impl Into<String>,
        array_size: i64,
    ) -> GridforgeResult<&VariableRow> {
        push_variable(&mut self.rows, ty, name, description, array_size)
    }

    pub fn remove_row(&mut self, id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    /// Move a row. Member order is significant for the generated layout;
    /// nothing is renumbered.
    pub fn reorder(&mut self, old_index: usize, target_index: usize) -> GridforgeResult<()> {
        if old_index >= self.rows.len() || target_index >= self.rows.len() {
            return Err(GridforgeError::invalid_argument(format!(
                "row index out of range: {old_index} -> {target_index}"
            )));
        }
        let row = self.rows.remove(old_index);
        self.rows.insert(target_index, row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_row_assigns_ids_and_validates() {
        let mut doc = ClassDocument::new();
        doc.add_row(FieldType::Int, "Hp", "hit points", 0).unwrap();
        doc.add_row(FieldType::parse("Item"), "Drops", "", -1).unwrap();
        assert_eq!(doc.rows[1].id, 2);

        assert!(doc.add_row(FieldType::Int, "  ", "", 0).is_err());
        assert!(doc.add_row(FieldType::Int, "Bad", "", -2).is_err());
        assert_eq!(doc.rows.len(), 2);
    }

    #[test]
    fn reorder_preserves_ids() {
        let mut doc = ClassDocument::new();
        doc.add_row(FieldType::Int, "A", "", 0).unwrap();
        doc.add_row(FieldType::Int, "B", "", 0).unwrap();
        doc.reorder(1, 0).unwrap();
        assert_eq!(doc.rows[0].name, "B");
        assert_eq!(doc.rows[0].id, 2);
    }

    #[test]
    fn wire_shape_uses_array_size_key() {
        let mut doc = ClassDocument::new();
        doc.add_row(FieldType::Vector2, "Pos", "", 0).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json[0]["arraySize"], 0);
        assert_eq!(json[0]["type"], "Vector2");
    }
}
