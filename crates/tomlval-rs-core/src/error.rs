//! Error types for schema construction, handler registration, and path parsing.

use crate::kind::ValueKind;
use thiserror::Error;

/// Errors returned by the public validation APIs.
#[derive(Debug, Error)]
pub enum TomlvalError {
    /// The document root is not a table.
    #[error("data must be a table, got {found}")]
    NotATable { found: ValueKind },
    /// The schema failed structural validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A handler has an illegal signature.
    #[error(transparent)]
    Handler(#[from] HandlerError),
    /// A key, pattern, or path string is malformed.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A schema rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema at {key}: {message}")]
pub struct SchemaError {
    /// Flattened key of the offending node (`root` for the document itself).
    pub key: String,
    /// Human-readable reason.
    pub message: String,
}

impl SchemaError {
    pub(crate) fn new(key: &str, message: impl Into<String>) -> Self {
        let key = if key.is_empty() { "root" } else { key };
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Illegal handler signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// More than two parameters were declared.
    #[error("handler must accept 0, 1, or 2 arguments, got {0}")]
    TooManyParameters(usize),
    /// A single parameter that is neither `key` nor `value`.
    #[error("handler must accept 'key' or 'value', got '{0}'")]
    InvalidParameter(String),
    /// Two parameters that are not exactly `key, value`.
    #[error("handler must accept 'key' and 'value', got '{0}' and '{1}'")]
    InvalidOrder(String, String),
}

/// Malformed keys, patterns, and paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A key or pattern violates the key grammar.
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
    /// A concrete path string could not be parsed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    /// Sequence indices under a path are not contiguous from zero.
    #[error("indices under '{path}' are not contiguous from 0")]
    SparseIndex { path: String },
    /// A rule lists no kinds or handlers to accept.
    #[error("rule for '{key}' must list at least one type or handler")]
    EmptyRule { key: String },
    /// A path is used both as a leaf and as a container.
    #[error("conflicting entries at '{path}'")]
    Conflict { path: String },
}

impl FormatError {
    pub(crate) fn invalid_key(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
