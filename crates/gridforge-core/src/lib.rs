//! gridforge-core
//!
//! Core primitives for GRIDFORGE:
//! - Field type tags and reference catalogs
//! - Typed values with total coercion and export formatting
//! - Schema documents (enums, class layouts, keyed tables, matrix tables,
//!   state machines) and their mutation operations
//! - Layout-graph maintenance for state-machine visualization
//! - CSV encode/decode for table import/export
//! - C# source and binary artifact generation
//!
//! The core crate does no filesystem, network, clock, or env access. Higher
//! layers (store/API/CLI) perform I/O and hand documents and catalogs in.

pub mod catalog;
pub mod csv;
pub mod errors;
pub mod field;
pub mod generate;
pub mod graph;
pub mod schema;
pub mod value;

pub use crate::errors::{GridforgeError, GridforgeResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::catalog::ReferenceCatalog;
    pub use crate::field::{Field, FieldType};
    pub use crate::graph::{GraphEdge, GraphNode};
    pub use crate::schema::class::{ClassDocument, VariableRow};
    pub use crate::schema::enums::{EnumDocument, EnumRow};
    pub use crate::schema::matrix::MatrixDocument;
    pub use crate::schema::state::{StateDocument, Transition};
    pub use crate::schema::table::{TableDocument, TableRecord};
    pub use crate::schema::validate_document_name;
    pub use crate::value::TypedValue;
    pub use crate::{GridforgeError, GridforgeResult};
}
