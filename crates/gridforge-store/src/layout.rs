//! On-disk layout.
//!
//! ```text
//! <root>/
//!   enum/
//!     enum_list.json
//!     MoveKind/
//!       MoveKind.json
//!       MoveKind.cs          (generated)
//!   class-data/ ...
//!   class-data-id/ ...
//!   class-data-matrix-id/ ...
//!   state-data/ ...
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The five document kinds the store manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Enum,
    ClassData,
    ClassDataId,
    ClassDataMatrixId,
    StateData,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Enum,
        DocumentKind::ClassData,
        DocumentKind::ClassDataId,
        DocumentKind::ClassDataMatrixId,
        DocumentKind::StateData,
    ];

    /// Namespace directory name under the data root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::ClassData => "class-data",
            Self::ClassDataId => "class-data-id",
            Self::ClassDataMatrixId => "class-data-matrix-id",
            Self::StateData => "state-data",
        }
    }

    /// Index file name inside the namespace directory.
    pub fn list_file_name(&self) -> String {
        format!("{}_list.json", self.dir_name())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.dir_name() == s)
    }

    /// The content a freshly created document starts with.
    pub fn empty_document(&self, entry: &ListEntry) -> Value {
        match self {
            Self::Enum | Self::ClassData => json!([]),
            Self::ClassDataId => json!({"columns": [], "rows": []}),
            Self::ClassDataMatrixId => json!({
                "rowId": entry.row_id.clone().unwrap_or_default(),
                "colId": entry.col_id.clone().unwrap_or_default(),
                "fields": [],
                "data": {},
            }),
            Self::StateData => json!({
                "transitions": [],
                "manager": [],
                "base": [],
                "nodes": [],
                "edges": [],
            }),
        }
    }
}

/// One index entry. Matrix entries also record their axis enums so listings
/// can display them without opening each document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: u64,
    pub name: String,
    #[serde(rename = "rowId", default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(rename = "colId", default, skip_serializing_if = "Option::is_none")]
    pub col_id: Option<String>,
}

impl ListEntry {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            row_id: None,
            col_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::parse(kind.dir_name()), Some(kind));
        }
        assert_eq!(DocumentKind::parse("nope"), None);
    }

    #[test]
    fn list_file_matches_namespace() {
        assert_eq!(DocumentKind::Enum.list_file_name(), "enum_list.json");
        assert_eq!(
            DocumentKind::ClassDataMatrixId.list_file_name(),
            "class-data-matrix-id_list.json"
        );
    }

    #[test]
    fn plain_entries_omit_axis_fields() {
        let entry = ListEntry::new(1, "MoveKind");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "MoveKind"}));
    }
}
