//! Sample schemas built in code.

use anyhow::anyhow;
use regex::Regex;
use serde_json::json;
use tomlval_rs_core::{Handler, Member, Schema, SchemaError, SchemaNode, ValueKind};

fn kind(kind: ValueKind) -> SchemaNode {
    SchemaNode::Kind(kind)
}

/// Fields shared by the specific and glob schemas.
fn structured_fields() -> Vec<(&'static str, SchemaNode)> {
    vec![
        ("array_numbers", SchemaNode::array([ValueKind::Integer])),
        ("array_strings", SchemaNode::array([ValueKind::String])),
        (
            "array_mixed",
            SchemaNode::array([
                ValueKind::Integer,
                ValueKind::String,
                ValueKind::Float,
                ValueKind::Boolean,
            ]),
        ),
        ("array_multiline", SchemaNode::array([ValueKind::String])),
        (
            "inline_table",
            SchemaNode::table([
                ("key1", kind(ValueKind::String)),
                ("key2", kind(ValueKind::Integer)),
                ("key3", kind(ValueKind::Boolean)),
            ]),
        ),
        (
            "dotted",
            SchemaNode::table([
                ("key", SchemaNode::table([("value", kind(ValueKind::String))])),
                (
                    "numbers",
                    SchemaNode::table([("list", SchemaNode::array([ValueKind::Integer]))]),
                ),
            ]),
        ),
        ("unicode_text", kind(ValueKind::String)),
        (
            "table",
            SchemaNode::table([
                ("key", kind(ValueKind::String)),
                (
                    "subtable",
                    SchemaNode::table([("nested_key", kind(ValueKind::Integer))]),
                ),
            ]),
        ),
        (
            "array_of_tables",
            SchemaNode::table_array(SchemaNode::table([
                ("name", kind(ValueKind::String)),
                ("value", kind(ValueKind::Integer)),
            ])),
        ),
        (
            "nested_array",
            SchemaNode::table_array(SchemaNode::table([
                ("name", kind(ValueKind::String)),
                (
                    "inner",
                    SchemaNode::table_array(SchemaNode::table([(
                        "name",
                        kind(ValueKind::String),
                    )])),
                ),
            ])),
        ),
    ]
}

/// Schema naming every scalar field of [`FULL_SPEC_TOML`](crate::FULL_SPEC_TOML).
pub fn full_spec_schema() -> Result<Schema, SchemaError> {
    let mut fields = structured_fields();
    let scalars = [
        ("string_basic", ValueKind::String),
        ("string_multiline", ValueKind::String),
        ("string_literal", ValueKind::String),
        ("string_multiline_literal", ValueKind::String),
        ("int_positive", ValueKind::Integer),
        ("int_negative", ValueKind::Integer),
        ("int_hex", ValueKind::Integer),
        ("int_oct", ValueKind::Integer),
        ("int_bin", ValueKind::Integer),
        ("int_large", ValueKind::Integer),
        ("float_simple", ValueKind::Float),
        ("float_exponent", ValueKind::Float),
        ("float_negative_exponent", ValueKind::Float),
        ("float_with_sign", ValueKind::Float),
        ("float_with_underscores", ValueKind::Float),
        ("float_large", ValueKind::Float),
        ("bool_true", ValueKind::Boolean),
        ("bool_false", ValueKind::Boolean),
        ("bool_case_sensitive", ValueKind::Boolean),
        ("datetime_utc", ValueKind::Datetime),
        ("datetime_offset", ValueKind::Datetime),
        ("datetime_with_fraction", ValueKind::Datetime),
        ("local_datetime", ValueKind::Datetime),
        ("local_date", ValueKind::Date),
        ("local_time", ValueKind::Time),
        ("escape_newline", ValueKind::String),
        ("escape_tab", ValueKind::String),
        ("escape_unicode", ValueKind::String),
    ];
    fields.extend(scalars.map(|(key, value_kind)| (key, kind(value_kind))));
    Schema::new(SchemaNode::table(fields))
}

/// Schema covering scalar fields with wildcard keys.
pub fn glob_schema() -> Result<Schema, SchemaError> {
    let mut fields = structured_fields();
    fields.extend([
        ("string_*", kind(ValueKind::String)),
        ("int_*", kind(ValueKind::Integer)),
        ("float_*", kind(ValueKind::Float)),
        ("bool_*", kind(ValueKind::Boolean)),
        ("*datetime_*", kind(ValueKind::Datetime)),
        (
            "local_*",
            SchemaNode::union([ValueKind::Datetime, ValueKind::Date, ValueKind::Time]),
        ),
        ("escape_*", kind(ValueKind::String)),
    ]);
    Schema::new(SchemaNode::table(fields))
}

/// Schema mixing kinds, handlers, and a catch-all for unknown keys.
pub fn with_functions_schema() -> Result<Schema, SchemaError> {
    let id = Handler::by_value(|value| {
        let pattern = Regex::new(r"^[A-Za-z-]+$")?;
        Ok(json!(value.as_str().is_some_and(|id| pattern.is_match(id))))
    })
    .named("check_id");
    let age = Handler::by_value(|value| match value.as_integer() {
        Some(age) => Ok(json!(0 < age)),
        None => Err(anyhow!("age must be an integer")),
    })
    .named("check_age");
    let unknown = Handler::niladic(|| Ok(json!("invalid-key")));
    Schema::new(SchemaNode::table([
        ("*_name", kind(ValueKind::String)),
        ("id", SchemaNode::Handler(id)),
        ("age", SchemaNode::union([Member::Handler(age)])),
        ("*", SchemaNode::Handler(unknown)),
    ]))
}
