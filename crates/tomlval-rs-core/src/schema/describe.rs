//! Reading schema descriptions written in TOML.

use super::{Member, SchemaNode, join_key};
use crate::error::SchemaError;
use crate::kind::ValueKind;
use std::collections::BTreeMap;
use toml::{Table, Value};

/// Describe a table of fields.
pub(super) fn describe_table(table: &Table, path: &str) -> Result<SchemaNode, SchemaError> {
    let mut fields = BTreeMap::new();
    for (key, value) in table {
        let node = describe_value(value, &join_key(path, key))?;
        fields.insert(key.clone(), node);
    }
    Ok(SchemaNode::Table(fields))
}

/// Describe a single field value.
fn describe_value(value: &Value, path: &str) -> Result<SchemaNode, SchemaError> {
    match value {
        Value::String(spec) => describe_kinds(spec, path),
        Value::Table(table) => describe_table(table, path),
        Value::Array(items) => describe_array(items, path),
        other => Err(invalid_field(
            path,
            format!(
                "expected a type name, array, or table, got {}",
                ValueKind::of(other)
            ),
        )),
    }
}

/// `"int"` or `"int | float"`.
fn describe_kinds(spec: &str, path: &str) -> Result<SchemaNode, SchemaError> {
    let mut kinds = spec
        .split('|')
        .map(|name| expect_kind(name, path))
        .collect::<Result<Vec<_>, _>>()?;
    if kinds.len() == 1 {
        return Ok(SchemaNode::Kind(kinds.remove(0)));
    }
    Ok(SchemaNode::Union(kinds.into_iter().map(Member::Kind).collect()))
}

/// `["int", "float"]` or `[{ id = "int" }]`.
fn describe_array(items: &[Value], path: &str) -> Result<SchemaNode, SchemaError> {
    if !items.is_empty() && items.iter().all(Value::is_table) {
        let templates = items
            .iter()
            .filter_map(Value::as_table)
            .map(|table| describe_table(table, &format!("{path}.[]")))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(SchemaNode::TableArray(templates));
    }
    let members = items
        .iter()
        .map(|item| match item {
            Value::String(name) => expect_kind(name, path).map(Member::Kind),
            _ => Err(invalid_field(
                path,
                "arrays must hold type names or a single table",
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaNode::Array(members))
}

fn expect_kind(name: &str, path: &str) -> Result<ValueKind, SchemaError> {
    name.trim()
        .parse::<ValueKind>()
        .map_err(|reason| invalid_field(path, reason))
}

fn invalid_field(path: &str, message: impl Into<String>) -> SchemaError {
    SchemaError::new(path, message)
}
