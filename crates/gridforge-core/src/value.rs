//! Typed values.
//!
//! Every record cell holds a value whose runtime shape matches its field's
//! declared type. Two operations maintain that invariant:
//! - [`TypedValue::default_for`] produces the canonical default per type
//! - [`TypedValue::coerce`] maps arbitrary raw input (a grid edit, a CSV
//!   cell, a freshly loaded document) onto the declared type
//!
//! Coercion is total: malformed input resolves to the type's default rather
//! than failing, so a document never becomes uneditable because of bad
//! imported data. [`TypedValue::export_text`] is the inverse-compatible
//! counterpart used by CSV export; primitive and vector values round-trip
//! through it losslessly.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::ReferenceCatalog;
use crate::field::FieldType;

/// A value tagged by its field's type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Vector2([f64; 2]),
    Vector3([f64; 3]),
    /// A formatted member identifier (`<Type>ID.<member>`), or `""` when the
    /// referenced document has no members.
    Reference(String),
}

impl TypedValue {
    /// The canonical default for a field type.
    ///
    /// Unknown reference targets and empty member lists yield an empty
    /// identifier rather than an error: references resolve dynamically and
    /// the target may simply not be loaded yet.
    pub fn default_for(ty: &FieldType, catalog: &ReferenceCatalog) -> Self {
        match ty {
            FieldType::Int => Self::Int(0),
            FieldType::Float => Self::Float(0.0),
            FieldType::Bool => Self::Bool(false),
            FieldType::Str => Self::Str(String::new()),
            FieldType::Vector2 => Self::Vector2([0.0, 0.0]),
            FieldType::Vector3 => Self::Vector3([0.0, 0.0, 0.0]),
            FieldType::Reference(target) => Self::Reference(
                catalog.default_identifier(target).unwrap_or_default(),
            ),
        }
    }

    /// Coerce raw input onto a field type. Never fails; never returns a
    /// value whose shape disagrees with `ty`.
    pub fn coerce(raw: &Value, ty: &FieldType, catalog: &ReferenceCatalog) -> Self {
        match ty {
            FieldType::Int => coerce_int(raw)
                .map(Self::Int)
                .unwrap_or_else(|| Self::default_for(ty, catalog)),
            FieldType::Float => coerce_float(raw)
                .map(Self::Float)
                .unwrap_or_else(|| Self::default_for(ty, catalog)),
            FieldType::Bool => Self::Bool(coerce_bool(raw)),
            FieldType::Str => match raw {
                Value::Null => Self::default_for(ty, catalog),
                Value::String(s) => Self::Str(s.clone()),
                Value::Bool(b) => Self::Str(b.to_string()),
                Value::Number(n) => Self::Str(n.to_string()),
                other => Self::Str(other.to_string()),
            },
            FieldType::Vector2 => match coerce_components(raw) {
                Some(c) if c.len() == 2 => Self::Vector2([c[0], c[1]]),
                _ => Self::default_for(ty, catalog),
            },
            FieldType::Vector3 => match coerce_components(raw) {
                Some(c) if c.len() == 3 => Self::Vector3([c[0], c[1], c[2]]),
                _ => Self::default_for(ty, catalog),
            },
            FieldType::Reference(target) => match raw {
                Value::String(s) if catalog.is_member_identifier(target, s) => {
                    Self::Reference(s.clone())
                }
                _ => Self::default_for(ty, catalog),
            },
        }
    }

    /// Coerce a CSV cell. An empty cell means "use the default".
    pub fn coerce_text(raw: &str, ty: &FieldType, catalog: &ReferenceCatalog) -> Self {
        if raw.is_empty() {
            return Self::default_for(ty, catalog);
        }
        Self::coerce(&Value::String(raw.to_string()), ty, catalog)
    }

    /// Returns true if the value's shape matches the field type.
    pub fn matches(&self, ty: &FieldType) -> bool {
        matches!(
            (self, ty),
            (Self::Int(_), FieldType::Int)
                | (Self::Float(_), FieldType::Float)
                | (Self::Bool(_), FieldType::Bool)
                | (Self::Str(_), FieldType::Str)
                | (Self::Vector2(_), FieldType::Vector2)
                | (Self::Vector3(_), FieldType::Vector3)
                | (Self::Reference(_), FieldType::Reference(_))
        )
    }

    /// The raw JSON form stored in documents.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(v) => Value::from(*v),
            Self::Float(v) => Value::from(*v),
            Self::Bool(v) => Value::from(*v),
            Self::Str(v) => Value::from(v.clone()),
            Self::Vector2(v) => Value::from(v.to_vec()),
            Self::Vector3(v) => Value::from(v.to_vec()),
            Self::Reference(v) => Value::from(v.clone()),
        }
    }

    /// The text form used by CSV export. Vectors serialize as JSON array
    /// text; everything else as its literal text representation.
    pub fn export_text(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Str(v) => v.clone(),
            Self::Vector2(v) => json_array_text(v),
            Self::Vector3(v) => json_array_text(v),
            Self::Reference(v) => v.clone(),
        }
    }
}

fn json_array_text(components: &[f64]) -> String {
    let items: Vec<Value> = components.iter().map(|c| Value::from(*c)).collect();
    Value::Array(items).to_string()
}

fn coerce_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Leading-integer parse: optional sign plus the longest leading digit run,
/// trailing text ignored. `"12abc"` is 12; no leading digits is no value.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }
    // i128 keeps i64::MIN parseable; anything past i64 range is a failure.
    let value = digits.parse::<i128>().ok()?;
    i64::try_from(if negative { -value } else { value }).ok()
}

fn coerce_float(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn coerce_bool(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        _ => false,
    }
}

/// Numeric components from a JSON array or a string holding a JSON array
/// literal. Non-numeric elements reject the whole array.
fn coerce_components(raw: &Value) -> Option<Vec<f64>> {
    let items: Vec<Value> = match raw {
        Value::Array(items) => items.clone(),
        Value::String(s) => serde_json::from_str::<Value>(s).ok().and_then(|v| match v {
            Value::Array(items) => Some(items),
            _ => None,
        })?,
        _ => return None,
    };
    items
        .iter()
        .map(|item| item.as_f64().filter(|f| f.is_finite()))
        .collect()
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Lenient transport form. Loaded documents re-coerce every cell against its
/// declared field type (`normalize` on the document), so the guess here only
/// has to be shape-preserving: numbers, bools, strings, and 2/3-element
/// numeric arrays map onto the obvious variants, anything else onto text.
impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match &raw {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => Self::Str(s.clone()),
            Value::Array(_) => match coerce_components(&raw) {
                Some(c) if c.len() == 2 => Self::Vector2([c[0], c[1]]),
                Some(c) if c.len() == 3 => Self::Vector3([c[0], c[1], c[2]]),
                _ => Self::Str(raw.to_string()),
            },
            Value::Null => Self::Str(String::new()),
            other => Self::Str(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn catalog() -> ReferenceCatalog {
        let mut c = ReferenceCatalog::new();
        c.insert("MoveKind", vec!["Idle".to_string(), "Run".to_string()]);
        c.insert("Hollow", Vec::new());
        c
    }

    #[test]
    fn defaults_per_type() {
        let c = catalog();
        assert_eq!(
            TypedValue::default_for(&FieldType::Int, &c),
            TypedValue::Int(0)
        );
        assert_eq!(
            TypedValue::default_for(&FieldType::Vector3, &c),
            TypedValue::Vector3([0.0, 0.0, 0.0])
        );
        assert_eq!(
            TypedValue::default_for(&FieldType::parse("MoveKind"), &c),
            TypedValue::Reference("MoveKindID.Idle".to_string())
        );
        assert_eq!(
            TypedValue::default_for(&FieldType::parse("Hollow"), &c),
            TypedValue::Reference(String::new())
        );
        assert_eq!(
            TypedValue::default_for(&FieldType::parse("NotLoaded"), &c),
            TypedValue::Reference(String::new())
        );
    }

    #[test]
    fn int_coercion_takes_leading_digits_and_falls_back_on_garbage() {
        let c = catalog();
        assert_eq!(
            TypedValue::coerce(&json!("42"), &FieldType::Int, &c),
            TypedValue::Int(42)
        );
        assert_eq!(
            TypedValue::coerce(&json!(3.9), &FieldType::Int, &c),
            TypedValue::Int(3)
        );
        // grid edits accept a leading integer and ignore the rest
        assert_eq!(
            TypedValue::coerce(&json!("12abc"), &FieldType::Int, &c),
            TypedValue::Int(12)
        );
        assert_eq!(
            TypedValue::coerce(&json!(" -4x"), &FieldType::Int, &c),
            TypedValue::Int(-4)
        );
        assert_eq!(
            TypedValue::coerce(&json!("abc"), &FieldType::Int, &c),
            TypedValue::Int(0)
        );
        assert_eq!(
            TypedValue::coerce(&json!(null), &FieldType::Int, &c),
            TypedValue::Int(0)
        );
    }

    #[test]
    fn bool_coercion_accepts_true_and_one() {
        let c = catalog();
        for raw in [json!(true), json!("true"), json!("TRUE"), json!("1")] {
            assert_eq!(
                TypedValue::coerce(&raw, &FieldType::Bool, &c),
                TypedValue::Bool(true)
            );
        }
        for raw in [json!(false), json!("yes"), json!(1), json!("0"), json!(null)] {
            assert_eq!(
                TypedValue::coerce(&raw, &FieldType::Bool, &c),
                TypedValue::Bool(false)
            );
        }
    }

    #[test]
    fn vector_coercion_enforces_arity() {
        let c = catalog();
        assert_eq!(
            TypedValue::coerce(&json!("[1,2]"), &FieldType::Vector2, &c),
            TypedValue::Vector2([1.0, 2.0])
        );
        assert_eq!(
            TypedValue::coerce(&json!([1, 2, 3]), &FieldType::Vector3, &c),
            TypedValue::Vector3([1.0, 2.0, 3.0])
        );
        assert_eq!(
            TypedValue::coerce(&json!("bad"), &FieldType::Vector2, &c),
            TypedValue::Vector2([0.0, 0.0])
        );
        assert_eq!(
            TypedValue::coerce(&json!([1, 2, 3]), &FieldType::Vector2, &c),
            TypedValue::Vector2([0.0, 0.0])
        );
        assert_eq!(
            TypedValue::coerce(&json!(["a", "b"]), &FieldType::Vector2, &c),
            TypedValue::Vector2([0.0, 0.0])
        );
    }

    #[test]
    fn reference_coercion_requires_catalog_membership() {
        let c = catalog();
        let ty = FieldType::parse("MoveKind");
        assert_eq!(
            TypedValue::coerce(&json!("MoveKindID.Run"), &ty, &c),
            TypedValue::Reference("MoveKindID.Run".to_string())
        );
        assert_eq!(
            TypedValue::coerce(&json!("Run"), &ty, &c),
            TypedValue::Reference("MoveKindID.Idle".to_string())
        );
        assert_eq!(
            TypedValue::coerce(&json!("x"), &FieldType::parse("Hollow"), &c),
            TypedValue::Reference(String::new())
        );
    }

    #[test]
    fn empty_csv_cell_yields_default() {
        let c = catalog();
        assert_eq!(
            TypedValue::coerce_text("", &FieldType::Float, &c),
            TypedValue::Float(0.0)
        );
        assert_eq!(
            TypedValue::coerce_text("", &FieldType::Str, &c),
            TypedValue::Str(String::new())
        );
    }

    fn arb_scalar() -> impl Strategy<Value = (TypedValue, FieldType)> {
        prop_oneof![
            any::<i64>().prop_map(|v| (TypedValue::Int(v), FieldType::Int)),
            (-1.0e9..1.0e9f64).prop_map(|v| (TypedValue::Float(v), FieldType::Float)),
            any::<bool>().prop_map(|v| (TypedValue::Bool(v), FieldType::Bool)),
            "[a-zA-Z0-9 _.-]{0,24}".prop_map(|v| (TypedValue::Str(v.clone()), FieldType::Str)),
            prop::array::uniform2(-1.0e6..1.0e6f64)
                .prop_map(|v| (TypedValue::Vector2(v), FieldType::Vector2)),
            prop::array::uniform3(-1.0e6..1.0e6f64)
                .prop_map(|v| (TypedValue::Vector3(v), FieldType::Vector3)),
        ]
    }

    proptest! {
        #[test]
        fn coercion_never_breaks_shape(raw in prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "\\PC{0,32}".prop_map(Value::from),
            prop::collection::vec(-1.0e9..1.0e9f64, 0..5)
                .prop_map(|v| Value::from(v)),
        ]) {
            let c = catalog();
            let types = [
                FieldType::Int,
                FieldType::Float,
                FieldType::Bool,
                FieldType::Str,
                FieldType::Vector2,
                FieldType::Vector3,
                FieldType::parse("MoveKind"),
                FieldType::parse("NotLoaded"),
            ];
            for ty in &types {
                let v = TypedValue::coerce(&raw, ty, &c);
                prop_assert!(v.matches(ty), "coerce({raw:?}, {ty:?}) produced {v:?}");
            }
        }

        #[test]
        fn export_round_trips_primitives_and_vectors((value, ty) in arb_scalar()) {
            let c = catalog();
            let text = value.export_text();
            let back = TypedValue::coerce_text(&text, &ty, &c);
            // An empty string cell is indistinguishable from "use default",
            // which for the string type is also "".
            prop_assert_eq!(back, value);
        }
    }

    #[test]
    fn reference_round_trips_through_export() {
        let c = catalog();
        let ty = FieldType::parse("MoveKind");
        let v = TypedValue::Reference("MoveKindID.Run".to_string());
        assert_eq!(TypedValue::coerce_text(&v.export_text(), &ty, &c), v);
    }
}
