//! Reference catalogs.
//!
//! Reference-typed fields resolve against the member lists of other
//! documents: an enum's properties, or a keyed table's record keys. Editors
//! fetch those lists once per screen; the catalog models them as an
//! explicitly passed, read-only context so value coercion stays a pure
//! function of its inputs.
//!
//! Member identifiers are formatted as `<Type>ID.<member>`, matching the
//! generated source the game engine consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered member lists keyed by document name.
///
/// Deterministic iteration order (`BTreeMap`) keeps exports and generated
/// artifacts stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    members: BTreeMap<String, Vec<String>>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the member list for a document.
    pub fn insert(&mut self, type_name: impl Into<String>, members: Vec<String>) {
        self.members.insert(type_name.into(), members);
    }

    /// Returns true if the catalog knows the document at all, even with an
    /// empty member list.
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.members.contains_key(type_name)
    }

    /// Member identifiers for a document, in declaration order. Unknown
    /// documents have no members.
    pub fn members(&self, type_name: &str) -> &[String] {
        self.members
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Format one member as its external identifier.
    pub fn format_member(type_name: &str, member: &str) -> String {
        format!("{type_name}ID.{member}")
    }

    /// All formatted identifiers for a document, in declaration order.
    pub fn formatted_members(&self, type_name: &str) -> Vec<String> {
        self.members(type_name)
            .iter()
            .map(|m| Self::format_member(type_name, m))
            .collect()
    }

    /// The default identifier for a document: its first member, formatted.
    pub fn default_identifier(&self, type_name: &str) -> Option<String> {
        self.members(type_name)
            .first()
            .map(|m| Self::format_member(type_name, m))
    }

    /// Returns true if `raw` is one of the document's formatted identifiers.
    pub fn is_member_identifier(&self, type_name: &str, raw: &str) -> bool {
        self.members(type_name)
            .iter()
            .any(|m| Self::format_member(type_name, m) == raw)
    }

    /// Document names known to the catalog, in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ReferenceCatalog {
        let mut c = ReferenceCatalog::new();
        c.insert("MoveKind", vec!["Idle".to_string(), "Run".to_string()]);
        c.insert("Empty", Vec::new());
        c
    }

    #[test]
    fn formats_members_in_declaration_order() {
        let c = catalog();
        assert_eq!(
            c.formatted_members("MoveKind"),
            vec!["MoveKindID.Idle", "MoveKindID.Run"]
        );
    }

    #[test]
    fn default_identifier_is_first_member() {
        let c = catalog();
        assert_eq!(
            c.default_identifier("MoveKind").as_deref(),
            Some("MoveKindID.Idle")
        );
        assert_eq!(c.default_identifier("Empty"), None);
        assert_eq!(c.default_identifier("Unknown"), None);
    }

    #[test]
    fn membership_requires_formatted_identifier() {
        let c = catalog();
        assert!(c.is_member_identifier("MoveKind", "MoveKindID.Run"));
        assert!(!c.is_member_identifier("MoveKind", "Run"));
        assert!(!c.is_member_identifier("MoveKind", "MoveKindID.Walk"));
    }
}
