//! Route modules, one per document kind plus the generation endpoints.
//!
//! Handlers share one shape: validate the name, delegate to the store and
//! the core document operations, answer `{"message": ...}`. Documents pass
//! through their typed representation on every save, so whatever reaches
//! disk already satisfies the shape invariants the generators rely on.

pub mod class_data;
pub mod enums;
pub mod generate;
pub mod matrices;
pub mod states;
pub mod tables;

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// Body of create and remove-entry requests. Matrix creates also carry
/// their axis enums.
#[derive(Debug, Deserialize)]
pub(crate) struct NameRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "rowId", default)]
    pub row_id: Option<String>,
    #[serde(rename = "colId", default)]
    pub col_id: Option<String>,
}

pub(crate) fn message(text: impl Into<String>) -> Json<Value> {
    Json(json!({ "message": text.into() }))
}
