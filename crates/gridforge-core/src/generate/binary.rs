//! Binary table artifacts.
//!
//! Layout (all integers little-endian, strings length-prefixed with a u16
//! byte count and UTF-8 encoded):
//!
//! Keyed table:
//! - u32 row count
//! - u16 column count, then per column: u8 type tag, string name
//! - per row: u32 id, string key, then one value per column in column order
//!
//! Matrix table:
//! - u16 row-key count + strings, u16 column-key count + strings
//! - u16 field count, then per field: u8 type tag, string name
//! - cells row-major over `row_keys × col_keys`, each cell one value per
//!   field in field order
//!
//! Values: int → i32, float → f32, bool → u8, string/reference → string,
//! Vector2 → 2×f32, Vector3 → 3×f32.

use bytes::BufMut;

use crate::errors::{GridforgeError, GridforgeResult};
use crate::field::FieldType;
use crate::schema::matrix::MatrixDocument;
use crate::schema::table::TableDocument;
use crate::value::TypedValue;

/// Stable on-disk type tags.
fn type_tag(ty: &FieldType) -> u8 {
    match ty {
        FieldType::Int => 0,
        FieldType::Float => 1,
        FieldType::Bool => 2,
        FieldType::Str => 3,
        FieldType::Vector2 => 4,
        FieldType::Vector3 => 5,
        FieldType::Reference(_) => 6,
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) -> GridforgeResult<()> {
    let len: u16 = s
        .len()
        .try_into()
        .map_err(|_| GridforgeError::invalid_argument(format!("string too long for artifact: {s:.32}")))?;
    buf.put_u16_le(len);
    buf.put_slice(s.as_bytes());
    Ok(())
}

fn put_value(buf: &mut Vec<u8>, value: &TypedValue) -> GridforgeResult<()> {
    match value {
        TypedValue::Int(v) => {
            let v: i32 = (*v).try_into().map_err(|_| {
                GridforgeError::invalid_argument(format!("int out of 32-bit range: {v}"))
            })?;
            buf.put_i32_le(v);
        }
        TypedValue::Float(v) => buf.put_f32_le(*v as f32),
        TypedValue::Bool(v) => buf.put_u8(*v as u8),
        TypedValue::Str(v) => put_str(buf, v)?,
        TypedValue::Reference(v) => put_str(buf, v)?,
        TypedValue::Vector2(v) => {
            for c in v {
                buf.put_f32_le(*c as f32);
            }
        }
        TypedValue::Vector3(v) => {
            for c in v {
                buf.put_f32_le(*c as f32);
            }
        }
    }
    Ok(())
}

fn put_count_u16(buf: &mut Vec<u8>, count: usize, what: &str) -> GridforgeResult<()> {
    let count: u16 = count
        .try_into()
        .map_err(|_| GridforgeError::invalid_argument(format!("too many {what} for artifact")))?;
    buf.put_u16_le(count);
    Ok(())
}

/// Encode a keyed table. Callers normalize first; a row missing a column's
/// cell indicates the invariant was broken upstream.
pub fn table_binary(doc: &TableDocument) -> GridforgeResult<Vec<u8>> {
    let mut buf = Vec::new();
    let rows: u32 = doc
        .rows
        .len()
        .try_into()
        .map_err(|_| GridforgeError::invalid_argument("too many rows for artifact"))?;
    buf.put_u32_le(rows);

    put_count_u16(&mut buf, doc.columns.len(), "columns")?;
    for column in &doc.columns {
        buf.put_u8(type_tag(&column.ty));
        put_str(&mut buf, &column.name)?;
    }

    for row in &doc.rows {
        let id: u32 = row.id.try_into().map_err(|_| {
            GridforgeError::invalid_argument(format!("record id out of range: {}", row.id))
        })?;
        buf.put_u32_le(id);
        put_str(&mut buf, &row.key)?;
        for column in &doc.columns {
            let cell = row.data.get(&column.name).ok_or_else(|| {
                GridforgeError::invariant(format!(
                    "record {} is missing column {}",
                    row.id, column.name
                ))
            })?;
            put_value(&mut buf, &cell.value)?;
        }
    }
    Ok(buf)
}

/// Encode a matrix. Callers reconcile keys first; a missing cell indicates
/// the bijection invariant was broken upstream.
pub fn matrix_binary(
    doc: &MatrixDocument,
    row_keys: &[String],
    col_keys: &[String],
) -> GridforgeResult<Vec<u8>> {
    let mut buf = Vec::new();

    put_count_u16(&mut buf, row_keys.len(), "row keys")?;
    for key in row_keys {
        put_str(&mut buf, key)?;
    }
    put_count_u16(&mut buf, col_keys.len(), "column keys")?;
    for key in col_keys {
        put_str(&mut buf, key)?;
    }

    put_count_u16(&mut buf, doc.fields.len(), "fields")?;
    for field in &doc.fields {
        buf.put_u8(type_tag(&field.ty));
        put_str(&mut buf, &field.name)?;
    }

    for row_key in row_keys {
        for col_key in col_keys {
            let cell = doc
                .data
                .get(row_key)
                .and_then(|row| row.get(col_key))
                .ok_or_else(|| {
                    GridforgeError::invariant(format!(
                        "matrix cell missing: ({row_key}, {col_key})"
                    ))
                })?;
            for field in &doc.fields {
                let value = cell.get(&field.name).ok_or_else(|| {
                    GridforgeError::invariant(format!(
                        "matrix cell ({row_key}, {col_key}) is missing field {}",
                        field.name
                    ))
                })?;
                put_value(&mut buf, value)?;
            }
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReferenceCatalog;
    use serde_json::json;

    #[test]
    fn table_layout_is_exact() {
        let c = ReferenceCatalog::new();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Int, "Hp", &c).unwrap();
        doc.add_field("W", FieldType::Bool, "On", &c).unwrap();
        doc.set_cell(1, "Hp", &json!(7), &c).unwrap();
        doc.set_cell(1, "On", &json!(true), &c).unwrap();

        let bytes = table_binary(&doc).unwrap();
        let mut expect: Vec<u8> = Vec::new();
        expect.extend_from_slice(&1u32.to_le_bytes()); // row count
        expect.extend_from_slice(&2u16.to_le_bytes()); // column count
        expect.push(0); // int tag
        expect.extend_from_slice(&2u16.to_le_bytes());
        expect.extend_from_slice(b"Hp");
        expect.push(2); // bool tag
        expect.extend_from_slice(&2u16.to_le_bytes());
        expect.extend_from_slice(b"On");
        expect.extend_from_slice(&1u32.to_le_bytes()); // row id
        expect.extend_from_slice(&4u16.to_le_bytes());
        expect.extend_from_slice(b"W_00");
        expect.extend_from_slice(&7i32.to_le_bytes());
        expect.push(1);
        assert_eq!(bytes, expect);
    }

    #[test]
    fn vector_and_string_values_encode() {
        let c = ReferenceCatalog::new();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Vector2, "Pos", &c).unwrap();
        doc.add_field("W", FieldType::Str, "Label", &c).unwrap();
        doc.set_cell(1, "Pos", &json!([1.0, 2.0]), &c).unwrap();
        doc.set_cell(1, "Label", &json!("hi"), &c).unwrap();

        let bytes = table_binary(&doc).unwrap();
        // tail: 1.0f, 2.0f, len(2), "hi"
        let tail_len = 4 + 4 + 2 + 2;
        let tail = &bytes[bytes.len() - tail_len..];
        assert_eq!(&tail[..4], &1.0f32.to_le_bytes());
        assert_eq!(&tail[4..8], &2.0f32.to_le_bytes());
        assert_eq!(&tail[8..10], &2u16.to_le_bytes());
        assert_eq!(&tail[10..], b"hi");
    }

    #[test]
    fn out_of_range_int_is_rejected() {
        let c = ReferenceCatalog::new();
        let mut doc = TableDocument::new();
        doc.add_field("W", FieldType::Int, "Big", &c).unwrap();
        doc.set_cell(1, "Big", &json!(i64::MAX), &c).unwrap();
        assert!(table_binary(&doc).is_err());
    }

    #[test]
    fn matrix_requires_reconciled_cells() {
        let c = ReferenceCatalog::new();
        let keys = vec!["A".to_string()];
        let mut doc = MatrixDocument::new("Row", "Col");
        doc.add_field(FieldType::Int, "Cost", "", &c).unwrap();

        assert!(matrix_binary(&doc, &keys, &keys).is_err());

        doc.reconcile_keys(&keys, &keys, &c);
        let bytes = matrix_binary(&doc, &keys, &keys).unwrap();
        // 1 row key "A", 1 col key "A", 1 field (tag+name), one i32 cell
        let expected_len = (2 + 2 + 1) + (2 + 2 + 1) + (2 + 1 + 2 + 4) + 4;
        assert_eq!(bytes.len(), expected_len);
    }
}
