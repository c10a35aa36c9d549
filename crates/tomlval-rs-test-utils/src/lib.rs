//! Test fixtures shared across tomlval crates.

pub mod documents;
pub mod schemas;

pub use documents::{FULL_SPEC_SCHEMA_TOML, FULL_SPEC_TOML, PERSON_TOML, parse_document};
pub use schemas::{full_spec_schema, glob_schema, with_functions_schema};
