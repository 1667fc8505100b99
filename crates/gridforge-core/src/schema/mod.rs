//! Schema documents and their mutation operations.
//!
//! One module per document kind:
//! - `enums`: enumeration rows with stable ids and contiguous values
//! - `class`: ordered class-layout rows (type/name/arraySize)
//! - `table`: keyed record tables (columns × rows of typed cells)
//! - `matrix`: tables addressed by a pair of enum-derived keys
//! - `state`: state machines (transitions, variable lists, layout graph)
//!
//! Shared rules: document names never contain `':'`; new record ids are
//! `max(existing, 0) + 1`; removal never compacts ids; removing the record
//! currently selected for detail viewing clears that selection.

use crate::errors::{GridforgeError, GridforgeResult};

pub mod class;
pub mod enums;
pub mod matrix;
pub mod state;
pub mod table;

/// Validate a document name before it reaches storage or a URL path.
pub fn validate_document_name(name: &str) -> GridforgeResult<()> {
    if name.trim().is_empty() {
        return Err(GridforgeError::validation("name is required"));
    }
    if name.contains(':') {
        return Err(GridforgeError::validation(format!(
            "name must not contain ':': {name}"
        )));
    }
    Ok(())
}

/// Next record id: `max(existing, 0) + 1`.
pub(crate) fn next_id<I: Iterator<Item = u64>>(ids: I) -> u64 {
    ids.max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        validate_document_name("Weapon").unwrap();
        assert!(validate_document_name("").is_err());
        assert!(validate_document_name("   ").is_err());
        assert!(validate_document_name("a:b").is_err());
    }

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(std::iter::empty()), 1);
        assert_eq!(next_id([3u64, 1, 2].into_iter()), 4);
    }
}
