//! Per-path outcomes of one validation pass.

use crate::kind::ValueKind;
use crate::path::Path;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use toml::Value;

/// Result of checking a single path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The value conforms.
    Ok,
    /// A required key is absent.
    Missing,
    /// The value's kind is not among the expected kinds.
    TypeMismatch {
        expected: Vec<ValueKind>,
        actual: ValueKind,
        value: Value,
    },
    /// A handler ran; its return value is reported as is.
    HandlerResult { result: serde_json::Value },
    /// A handler returned an error.
    HandlerFailed { message: String },
}

impl Outcome {
    pub(crate) fn mismatch(expected: Vec<ValueKind>, value: &Value) -> Self {
        Outcome::TypeMismatch {
            expected,
            actual: ValueKind::of(value),
            value: value.clone(),
        }
    }

    /// Missing keys, mismatches, and handler failures.
    ///
    /// Handler results are left to the caller to interpret.
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            Outcome::Missing | Outcome::TypeMismatch { .. } | Outcome::HandlerFailed { .. }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => f.write_str("ok"),
            Outcome::Missing => f.write_str("missing"),
            Outcome::TypeMismatch {
                expected,
                actual,
                value,
            } => {
                let expected = expected
                    .iter()
                    .map(|kind| kind.name())
                    .collect::<Vec<_>>()
                    .join(" | ");
                write!(f, "expected {expected}, got {actual} ({value})")
            }
            Outcome::HandlerResult { result } => write!(f, "handler returned {result}"),
            Outcome::HandlerFailed { message } => write!(f, "handler failed: {message}"),
        }
    }
}

/// Immutable map from data path to outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    outcomes: BTreeMap<Path, Outcome>,
}

impl ValidationReport {
    /// Record an outcome unless the path already has one.
    pub(crate) fn record(&mut self, path: Path, outcome: Outcome) {
        self.outcomes.entry(path).or_insert(outcome);
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.outcomes.contains_key(path)
    }

    /// Outcome for a path in canonical string form.
    pub fn get(&self, path: &str) -> Option<&Outcome> {
        let path = path.parse::<Path>().ok()?;
        self.get_path(&path)
    }

    /// Outcome for a typed path.
    pub fn get_path(&self, path: &Path) -> Option<&Outcome> {
        self.outcomes.get(path)
    }

    /// Outcomes in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Outcome)> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Paths reported missing.
    pub fn missing(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| **outcome == Outcome::Missing)
            .map(|(path, _)| path)
            .collect()
    }

    /// Entries whose outcome is a violation.
    pub fn violations(&self) -> impl Iterator<Item = (&Path, &Outcome)> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_violation())
    }

    pub fn has_violations(&self) -> bool {
        self.violations().next().is_some()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (path, outcome)) in self.outcomes.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{path}: {outcome}")?;
        }
        Ok(())
    }
}
