//! Field type tags.
//!
//! A field's type is one of the built-in tags (`int`, `float`, `bool`,
//! `string`, `Vector2`, `Vector3`) or a reference to another document by
//! name (an enum, a class layout, or a keyed record table). Built-in tags
//! match case-insensitively; anything else is carried verbatim as a
//! reference and resolved later against a [`crate::catalog::ReferenceCatalog`].
//!
//! Reference targets are an open set: documents are created and deleted at
//! runtime, so an unresolvable reference is not an error here.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// The type tag of a field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    Int,
    Float,
    Bool,
    Str,
    Vector2,
    Vector3,
    /// A reference to another document by name.
    Reference(String),
}

impl FieldType {
    /// Parse a type tag. Built-ins match case-insensitively; any other
    /// non-empty string becomes a reference tag.
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "int" => Self::Int,
            "float" => Self::Float,
            "bool" => Self::Bool,
            "string" => Self::Str,
            "vector2" => Self::Vector2,
            "vector3" => Self::Vector3,
            _ => Self::Reference(tag.to_string()),
        }
    }

    /// Canonical tag text. References render as their target name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Reference(name) => name.as_str(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Returns the referenced document name, if any.
    pub fn reference_target(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&tag))
    }
}

/// A declared field: a type tag, a name unique within its schema, and an
/// optional description. Keyed-table columns omit the description on the
/// wire; matrix fields carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Field {
    pub fn new(ty: FieldType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tags_match_case_insensitively() {
        assert_eq!(FieldType::parse("INT"), FieldType::Int);
        assert_eq!(FieldType::parse("vector2"), FieldType::Vector2);
        assert_eq!(FieldType::parse("Vector3"), FieldType::Vector3);
        assert_eq!(FieldType::parse("String"), FieldType::Str);
    }

    #[test]
    fn unknown_tag_becomes_reference() {
        let ty = FieldType::parse("WeaponKind");
        assert_eq!(ty, FieldType::Reference("WeaponKind".to_string()));
        assert_eq!(ty.as_str(), "WeaponKind");
        assert_eq!(ty.reference_target(), Some("WeaponKind"));
    }

    #[test]
    fn tag_round_trips_through_json() {
        for tag in ["int", "float", "bool", "string", "Vector2", "Vector3", "EnemyKind"] {
            let ty = FieldType::parse(tag);
            let json = serde_json::to_string(&ty).unwrap();
            let back: FieldType = serde_json::from_str(&json).unwrap();
            assert_eq!(ty, back);
        }
    }

    #[test]
    fn field_omits_empty_description() {
        let f = Field::new(FieldType::Int, "Damage");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json, serde_json::json!({"type": "int", "name": "Damage"}));
    }
}
