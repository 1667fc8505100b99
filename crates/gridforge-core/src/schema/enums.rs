//! Enumeration documents.
//!
//! An enum document is a row list `{id, property, value, description}`.
//! Values number from 1 and stay contiguous after reordering; ids are stable
//! and never reused. Loading is lenient: rows whose `value` is missing or
//! not a finite number are dropped, and missing ids are filled from the row
//! position, so documents produced by older tooling still open.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{GridforgeError, GridforgeResult};
use crate::schema::next_id;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumRow {
    pub id: u64,
    pub property: String,
    pub value: i64,
    pub description: String,
}

/// The document is a bare JSON array of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnumDocument {
    pub rows: Vec<EnumRow>,
}

impl EnumDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row. The new value is `max(values, 0) + 1`.
    pub fn add_row(
        &mut self,
        property: impl Into<String>,
        description: impl Into<String>,
    ) -> GridforgeResult<&EnumRow> {
        let property = property.into();
        if property.trim().is_empty() {
            return Err(GridforgeError::validation("property is required"));
        }
        let id = next_id(self.rows.iter().map(|r| r.id));
        let value = self.rows.iter().map(|r| r.value).max().unwrap_or(0) + 1;
        self.rows.push(EnumRow {
            id,
            property,
            value,
            description: description.into(),
        });
        Ok(self.rows.last().expect("row just pushed"))
    }

    /// Append `count` placeholder rows named `<name>_<i>` with consecutive
    /// values, continuing from the current maxima.
    pub fn add_defaults(&mut self, name: &str, count: usize) -> GridforgeResult<()> {
        if count == 0 {
            return Err(GridforgeError::validation("enter a positive row count"));
        }
        let base_id = self.rows.iter().map(|r| r.id).max().unwrap_or(0);
        let base_value = self.rows.iter().map(|r| r.value).max().unwrap_or(0) + 1;
        for index in 0..count {
            self.rows.push(EnumRow {
                id: base_id + index as u64 + 1,
                property: format!("{name}_{index}"),
                value: base_value + index as i64,
                description: format!("{name}_{index} (default)"),
            });
        }
        Ok(())
    }

    /// Remove a row by id. Ids of the other rows are untouched.
    pub fn remove_row(&mut self, id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        self.rows.len() != before
    }

    /// Move a row and renumber all values contiguously from 1 in the new
    /// order. Ids stay with their rows.
    pub fn reorder(&mut self, old_index: usize, target_index: usize) -> GridforgeResult<()> {
        if old_index >= self.rows.len() || target_index >= self.rows.len() {
            return Err(GridforgeError::invalid_argument(format!(
                "row index out of range: {old_index} -> {target_index}"
            )));
        }
        let row = self.rows.remove(old_index);
        self.rows.insert(target_index, row);
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.value = index as i64 + 1;
        }
        Ok(())
    }

    /// Member identifiers in declaration order, for reference catalogs.
    pub fn properties(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.property.clone()).collect()
    }

    pub fn max_value(&self) -> i64 {
        self.rows.iter().map(|r| r.value).max().unwrap_or(-1)
    }
}

impl<'de> Deserialize<'de> for EnumDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct WireRow {
            #[serde(default)]
            id: Option<u64>,
            #[serde(default)]
            property: String,
            #[serde(default)]
            value: Value,
            #[serde(default)]
            description: String,
        }

        let raw: Vec<WireRow> = Vec::deserialize(deserializer)?;
        let rows = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, w)| {
                let value = match &w.value {
                    Value::Number(n) => n
                        .as_i64()
                        .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
                    _ => None,
                }?;
                Some(EnumRow {
                    id: w.id.unwrap_or(index as u64 + 1),
                    property: w.property,
                    value,
                    description: w.description,
                })
            })
            .collect();
        Ok(Self { rows })
    }
}
