//! CSV encode/decode for table import and export.
//!
//! The dialect is deliberately small and explicit:
//! - every field is quoted on output, embedded quotes doubled
//! - input accepts quoted and unquoted fields, `\n` or `\r\n` line ends
//! - the first row is a header; records are keyed by header name
//! - blank lines are skipped
//!
//! This keeps export → import round-trips lossless for any cell text,
//! including commas, quotes, and newlines inside values.

use std::collections::BTreeMap;

use crate::errors::{GridforgeError, GridforgeResult};

/// Quote one field: wrap in double quotes, double embedded quotes.
pub fn quote_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Encode a header row plus data rows, quoting every field.
pub fn encode(header: &[String], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(encode_row(header));
    for row in rows {
        lines.push(encode_row(row));
    }
    lines.join("\n")
}

fn encode_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse CSV text into rows of fields.
pub fn parse(text: &str) -> GridforgeResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut saw_field = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                saw_field = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                saw_field = true;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_row(&mut rows, &mut row, &mut field, &mut saw_field);
            }
            '\n' => end_row(&mut rows, &mut row, &mut field, &mut saw_field),
            _ => {
                field.push(ch);
                saw_field = true;
            }
        }
    }
    if in_quotes {
        return Err(GridforgeError::serialization("unterminated quoted field"));
    }
    end_row(&mut rows, &mut row, &mut field, &mut saw_field);
    Ok(rows)
}

fn end_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String, saw_field: &mut bool) {
    if row.is_empty() && field.is_empty() && !*saw_field {
        // blank line
        return;
    }
    row.push(std::mem::take(field));
    rows.push(std::mem::take(row));
    *saw_field = false;
}

/// Parse CSV with a header row into records keyed by header name.
///
/// Short rows leave later headers absent; extra cells are ignored, matching
/// how header-keyed importers behave.
pub fn parse_records(text: &str) -> GridforgeResult<(Vec<String>, Vec<BTreeMap<String, String>>)> {
    let mut rows = parse(text)?;
    if rows.is_empty() {
        return Err(GridforgeError::serialization("empty CSV input"));
    }
    let header = rows.remove(0);
    let records = rows
        .into_iter()
        .map(|row| {
            header
                .iter()
                .zip(row)
                .map(|(h, v)| (h.clone(), v))
                .collect::<BTreeMap<_, _>>()
        })
        .collect();
    Ok((header, records))
}
