//! Schema validation engine for TOML documents.
//!
//! This crate owns path flattening, key patterns and their specificity
//! ordering, the schema model, the handler registry, and the validator that
//! ties them together into a per-path report.

mod error;
pub mod flatten;
mod handler;
mod kind;
mod path;
pub mod pattern;
mod registry;
mod report;
mod schema;
mod validator;

/// Public error types returned by schema, registration, and path APIs.
pub use error::{FormatError, HandlerError, SchemaError, TomlvalError};
pub use flatten::{flatten, lookup, unflatten};
/// Caller-supplied handlers and their shapes.
pub use handler::{Handler, HandlerOutput, HandlerShape};
pub use kind::ValueKind;
pub use path::{Path, Segment};
pub use pattern::{KeyPattern, Specificity};
/// Pattern-keyed rules.
pub use registry::{HandlerRegistry, RegistryEntry, Rule};
/// Validation output.
pub use report::{Outcome, ValidationReport};
/// Schema descriptions and the compiled schema.
pub use schema::{Member, Schema, SchemaEntry, SchemaNode};
pub use validator::Validator;
