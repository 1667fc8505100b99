//! C# source generation.
//!
//! Output conventions shared by every emitter:
//! - each enum carries `None = -1` and a trailing `Max` sentinel one past
//!   the highest value, so engine code can range-check and iterate
//! - descriptions become trailing `//` comments
//! - member order follows document order

use crate::field::FieldType;
use crate::schema::class::VariableRow;
use crate::schema::enums::EnumDocument;
use crate::schema::matrix::MatrixDocument;
use crate::schema::state::StateDocument;
use crate::schema::table::TableDocument;

/// `public enum <name>` from an enum document.
pub fn enum_source(name: &str, doc: &EnumDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("public enum {name} {{\n"));
    out.push_str("    None = -1, // default\n");
    for row in &doc.rows {
        out.push_str(&format!(
            "    {} = {},{}\n",
            row.property,
            row.value,
            comment(&row.description)
        ));
    }
    out.push_str(&format!("    Max = {}\n", doc.max_value() + 1));
    out.push_str("}\n");
    out
}

/// `public enum <name>ID` over a keyed table's record keys, valued by
/// record id. This is the type the `<name>ID.<key>` cell identifiers
/// resolve against.
pub fn table_id_enum_source(name: &str, doc: &TableDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("public enum {name}ID {{\n"));
    out.push_str("    None = -1, // default\n");
    let mut max_id: i64 = -1;
    for row in &doc.rows {
        out.push_str(&format!(
            "    {} = {},{}\n",
            row.key,
            row.id,
            comment(&row.description)
        ));
        max_id = max_id.max(row.id as i64);
    }
    out.push_str(&format!("    Max = {}\n", max_id + 1));
    out.push_str("}\n");
    out
}

/// `public class <name>` from a class layout document.
pub fn class_source(name: &str, rows: &[VariableRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("public class {name} {{\n"));
    for row in rows {
        out.push_str(&member_line(row));
    }
    out.push_str("}\n");
    out
}

/// Per-matrix header: the cell class plus the axis binding comment.
pub fn matrix_header_source(name: &str, doc: &MatrixDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "// {name}: indexed by {}ID (rows) x {}ID (columns)\n",
        doc.row_id, doc.col_id
    ));
    out.push_str(&format!("public class {name}Cell {{\n"));
    for field in &doc.fields {
        out.push_str(&format!(
            "    public {} {};{}\n",
            cs_type(&field.ty),
            field.name,
            comment(&field.description)
        ));
    }
    out.push_str("}\n");
    out
}

/// One enum indexing every matrix document, in the given order.
pub fn matrix_table_id_source(names: &[String]) -> String {
    let mut out = String::new();
    out.push_str("public enum MatrixTableID {\n");
    out.push_str("    None = -1, // default\n");
    for (index, name) in names.iter().enumerate() {
        out.push_str(&format!("    {name} = {index},\n"));
    }
    out.push_str(&format!("    Max = {}\n", names.len()));
    out.push_str("}\n");
    out
}

/// State-machine skeleton: the state enum, the transition table as
/// comments, and the manager/base variable classes.
pub fn state_source(name: &str, doc: &StateDocument) -> String {
    let mut out = String::new();

    let states = doc.states();
    out.push_str(&format!("public enum {name}State {{\n"));
    out.push_str("    None = -1, // default\n");
    for (index, state) in states.iter().enumerate() {
        out.push_str(&format!("    {state} = {index},\n"));
    }
    out.push_str(&format!("    Max = {}\n", states.len()));
    out.push_str("}\n\n");

    out.push_str("// Transitions:\n");
    for transition in &doc.transitions {
        let condition = if transition.condition.is_empty() {
            String::new()
        } else {
            format!(" when {}", transition.condition)
        };
        out.push_str(&format!(
            "//   {} -> {}{}\n",
            transition.from_state, transition.to_state, condition
        ));
        for variable in &transition.variables {
            out.push_str(&format!(
                "//     {} {}\n",
                cs_member_type(variable),
                variable.name
            ));
        }
    }
    out.push('\n');

    out.push_str(&class_source(&format!("{name}Manager"), &doc.manager));
    out.push('\n');
    out.push_str(&class_source(&format!("{name}Base"), &doc.base));
    out
}

fn member_line(row: &VariableRow) -> String {
    let ty = cs_type(&row.ty);
    let decl = match row.array_size {
        -1 => format!("public List<{ty}> {}", row.name),
        0 => format!("public {ty} {}", row.name),
        n => format!("public {ty}[] {} = new {ty}[{n}]", row.name),
    };
    format!("    {decl};{}\n", comment(&row.description))
}

fn cs_member_type(row: &VariableRow) -> String {
    let ty = cs_type(&row.ty);
    match row.array_size {
        -1 => format!("List<{ty}>"),
        0 => ty.to_string(),
        _ => format!("{ty}[]"),
    }
}

fn cs_type(ty: &FieldType) -> &str {
    match ty {
        FieldType::Int => "int",
        FieldType::Float => "float",
        FieldType::Bool => "bool",
        FieldType::Str => "string",
        FieldType::Vector2 => "Vector2",
        FieldType::Vector3 => "Vector3",
        FieldType::Reference(name) => name.as_str(),
    }
}

fn comment(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!(" // {description}")
    }
}
