//! gridforge-store
//!
//! Local persistence for GRIDFORGE documents:
//! - one namespace directory per document kind under a data root
//! - `<kind>_list.json` index (`[{id, name, ...}]`, ids assigned max+1)
//! - one `<name>/<name>.json` document per entry
//! - generated artifacts placed next to their source document
//!
//! Writes are atomic (temp file + rename) and serialized behind a
//! store-wide lock. Deleting a document does not cascade into other
//! documents that reference its name; referencing fields resolve to their
//! coercion fallback instead.

pub mod error;
pub mod layout;
pub mod store;

pub use crate::error::{StoreError, StoreResult};
pub use crate::layout::{DocumentKind, ListEntry};
pub use crate::store::{Store, StoreConfig};
