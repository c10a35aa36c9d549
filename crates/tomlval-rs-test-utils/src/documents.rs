//! Sample documents and schema descriptions.

use toml::{Table, Value};

/// A document exercising every TOML value form.
pub const FULL_SPEC_TOML: &str = r#"
string_basic = "Hello, World!"
string_multiline = """
Roses are red
Violets are blue"""
string_literal = 'C:\Users\nodejs\templates'
string_multiline_literal = '''
The first newline is
trimmed in raw strings.'''
int_positive = 42
int_negative = -17
int_hex = 0xDEADBEEF
int_oct = 0o755
int_bin = 0b11010110
int_large = 9_223_372_036_854_775_807
float_simple = 3.14
float_exponent = 5e+22
float_negative_exponent = 1e-6
float_with_sign = +1.0
float_with_underscores = 224_617.445_991_228
float_large = 1.7976931348623157e308
bool_true = true
bool_false = false
bool_case_sensitive = false
datetime_utc = 1979-05-27T07:32:00Z
datetime_offset = 1979-05-27T00:32:00-07:00
datetime_with_fraction = 1979-05-27T00:32:00.999999-07:00
local_datetime = 1979-05-27T07:32:00
local_date = 1979-05-27
local_time = 07:32:00
array_numbers = [1, 2, 3]
array_strings = ["red", "yellow", "green"]
array_mixed = [1, "two", 3.0, true]
array_multiline = [
  "first",
  "second",
]
inline_table = { key1 = "value1", key2 = 123, key3 = true }
dotted.key.value = "dotted key"
dotted.numbers.list = [1, 2, 3]
unicode_text = "Unicode: \u03B1\u03B2\u03B3"
escape_newline = "line1\nline2"
escape_tab = "col1\tcol2"
escape_unicode = "\u00E9"

[table]
key = "value"

[table.subtable]
nested_key = 42

[[array_of_tables]]
name = "first"
value = 1

[[array_of_tables]]
name = "second"
value = 2

[[nested_array]]
name = "outer"

[[nested_array.inner]]
name = "inner one"

[[nested_array.inner]]
name = "inner two"
"#;

/// Description of [`FULL_SPEC_TOML`] with one key per field.
pub const FULL_SPEC_SCHEMA_TOML: &str = r#"
string_basic = "str"
string_multiline = "str"
string_literal = "str"
string_multiline_literal = "str"
int_positive = "int"
int_negative = "int"
int_hex = "int"
int_oct = "int"
int_bin = "int"
int_large = "int"
float_simple = "float"
float_exponent = "float"
float_negative_exponent = "float"
float_with_sign = "float"
float_with_underscores = "float"
float_large = "float"
bool_true = "bool"
bool_false = "bool"
bool_case_sensitive = "bool"
datetime_utc = "datetime"
datetime_offset = "datetime"
datetime_with_fraction = "datetime"
local_datetime = "datetime"
local_date = "date"
local_time = "time"
array_numbers = ["int"]
array_strings = ["str"]
array_mixed = ["int", "str", "float", "bool"]
array_multiline = ["str"]
inline_table = { key1 = "str", key2 = "int", key3 = "bool" }
unicode_text = "str"
escape_newline = "str"
escape_tab = "str"
escape_unicode = "str"

[dotted.key]
value = "str"

[dotted.numbers]
list = ["int"]

[table]
key = "str"

[table.subtable]
nested_key = "int"

[[array_of_tables]]
name = "str"
value = "int"

[[nested_array]]
name = "str"

[[nested_array.inner]]
name = "str"
"#;

/// A person record for the handler-driven schema.
pub const PERSON_TOML: &str = r#"
first_name = "Ada"
last_name = "Lovelace"
id = "ada-lovelace"
age = 36
nickname = "Countess"
"#;

/// Parse a document into a table value.
pub fn parse_document(doc: &str) -> Result<Value, toml::de::Error> {
    toml::from_str::<Table>(doc).map(Value::Table)
}
