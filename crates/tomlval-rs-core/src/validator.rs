//! Validation of one document against an optional schema and handlers.
//!
//! A pass runs in two steps over a registry merged from the schema and the
//! explicit registrations:
//!
//! 1. The structure step walks every literal and template schema key
//!    through the document, reporting absent keys, containers of the wrong
//!    kind, and container values at a schema key.
//! 2. The leaf step resolves every flattened document path to its most
//!    specific rule and applies it.
//!
//! The first outcome recorded for a path is kept.

use crate::error::TomlvalError;
use crate::flatten::{flatten, lookup};
use crate::handler::{Handler, HandlerOutput};
use crate::kind::ValueKind;
use crate::path::Path;
use crate::pattern::KeySegment;
use crate::registry::{HandlerRegistry, RegistryEntry, Rule};
use crate::report::{Outcome, ValidationReport};
use crate::schema::{Member, Schema, SchemaEntry};
use log::{debug, warn};
use toml::{Table, Value};

/// Validates a document; handlers are registered before calling
/// [`Validator::validate`].
#[derive(Debug)]
pub struct Validator<'a> {
    data: &'a Value,
    table: &'a Table,
    schema: Option<&'a Schema>,
    handlers: HandlerRegistry,
}

impl<'a> Validator<'a> {
    /// Create a validator; the document root must be a table.
    pub fn new(data: &'a Value, schema: Option<&'a Schema>) -> Result<Self, TomlvalError> {
        let Value::Table(table) = data else {
            return Err(TomlvalError::NotATable {
                found: ValueKind::of(data),
            });
        };
        Ok(Self {
            data,
            table,
            schema,
            handlers: HandlerRegistry::new(),
        })
    }

    /// Register a kind or handler for a pattern.
    ///
    /// Explicit registrations replace schema rules with the same key.
    pub fn add_handler(&mut self, pattern: &str, rule: impl Into<Rule>) -> Result<(), TomlvalError> {
        self.handlers.register(pattern, rule)?;
        Ok(())
    }

    /// Register a callback whose shape comes from a declared parameter list.
    pub fn add_handler_with_params(
        &mut self,
        pattern: &str,
        params: &[&str],
        f: impl Fn(&str, &Value) -> HandlerOutput + Send + Sync + 'static,
    ) -> Result<(), TomlvalError> {
        self.handlers.register_with_params(pattern, params, f)
    }

    /// Explicit registrations, in order.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn schema(&self) -> Option<&'a Schema> {
        self.schema
    }

    /// Run a full pass and collect every outcome.
    pub fn validate(&self) -> ValidationReport {
        let registry = self.merged_registry();
        debug!(
            "validating document (schema_keys={}, rules={})",
            self.schema.map_or(0, Schema::len),
            registry.len()
        );
        let mut report = ValidationReport::default();
        if let Some(schema) = self.schema {
            for entry in schema.entries() {
                if !entry.pattern().has_wildcard() {
                    let walk = Walk {
                        entry,
                        registry: &registry,
                    };
                    self.walk(&walk, 0, self.data, Path::root(), &mut report);
                }
            }
        }
        self.check_leaves(&registry, &mut report);
        debug!(
            "validation finished (paths={}, violations={})",
            report.len(),
            report.violations().count()
        );
        report
    }

    /// Schema rules first, then explicit registrations on top.
    fn merged_registry(&self) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        if let Some(schema) = self.schema {
            for entry in schema.entries() {
                registry.put(RegistryEntry::new(
                    entry.pattern().clone(),
                    entry.rule().clone(),
                ));
            }
        }
        for entry in self.handlers.entries() {
            registry.put(entry.clone());
        }
        registry
    }

    /// Follow one schema key from segment `idx` below `current`.
    fn walk(
        &self,
        walk: &Walk<'_>,
        idx: usize,
        current: &Value,
        at: Path,
        report: &mut ValidationReport,
    ) {
        let segments = walk.entry.segments();
        let Some(segment) = segments.get(idx) else {
            if ValueKind::of(current).is_container() {
                let key = at.to_string();
                let rule = walk
                    .registry
                    .resolve_rule(&key)
                    .unwrap_or(walk.entry.rule());
                report.record(at, apply(rule, &key, current));
            }
            return;
        };
        match (segment, current) {
            (KeySegment::Name { body, .. }, Value::Table(table)) => match table.get(body) {
                Some(child) => self.walk(walk, idx + 1, child, at.field(body), report),
                None if is_optional(&segments[idx..]) => {}
                None => {
                    let missing = segments[idx..]
                        .iter()
                        .map_while(|segment| match segment {
                            KeySegment::Name { body, .. } => Some(body.as_str()),
                            _ => None,
                        })
                        .fold(at, |path, name| path.field(name));
                    report.record(missing, Outcome::Missing);
                }
            },
            (KeySegment::AnyIndex, Value::Array(items)) => {
                for (pos, item) in items.iter().enumerate() {
                    self.walk(walk, idx + 1, item, at.index(pos), report);
                }
            }
            (KeySegment::Name { .. }, other) => {
                report.record(at, Outcome::mismatch(vec![ValueKind::Table], other));
            }
            // schema keys carry `[]` templates only, never concrete indices
            (_, other) => {
                report.record(at, Outcome::mismatch(vec![ValueKind::Array], other));
            }
        }
    }

    /// Apply the most specific rule to every flattened leaf.
    ///
    /// Leaves below a container the structure step already judged are left
    /// to rules other than the catch-all.
    fn check_leaves(&self, registry: &HandlerRegistry, report: &mut ValidationReport) {
        let judged: Vec<Path> = report
            .iter()
            .filter(|(path, _)| {
                lookup(self.data, path).is_some_and(|value| ValueKind::of(value).is_container())
            })
            .map(|(path, _)| path.clone())
            .collect();
        for (path, value) in flatten(self.table) {
            if report.contains(&path) {
                continue;
            }
            let key = path.to_string();
            let Some(entry) = registry.resolve(&key) else {
                continue;
            };
            if is_catch_all(entry) && judged.iter().any(|parent| is_below(&path, parent)) {
                continue;
            }
            let Rule::Each(members) = entry.rule() else {
                let outcome = apply(entry.rule(), &key, &value);
                report.record(path, outcome);
                continue;
            };
            match entry.pattern().element_prefix(&key) {
                None => report.record(path, Outcome::mismatch(vec![ValueKind::Array], &value)),
                Some(prefix) if prefix == key => {
                    report.record(path, accept(members, &key, &value));
                }
                Some(prefix) => {
                    let element = path.prefix(prefix.split('.').count());
                    if report.contains(&element) {
                        continue;
                    }
                    if let Some(item) = lookup(self.data, &element) {
                        let outcome = accept(members, prefix, item);
                        report.record(element, outcome);
                    }
                }
            }
        }
    }
}

/// State shared while walking one schema key.
struct Walk<'r> {
    entry: &'r SchemaEntry,
    registry: &'r HandlerRegistry,
}

fn is_catch_all(entry: &RegistryEntry) -> bool {
    entry.pattern().key() == "*"
}

/// Whether `path` lies strictly inside `parent`.
fn is_below(path: &Path, parent: &Path) -> bool {
    path.len() > parent.len() && path.segments().starts_with(parent.segments())
}

/// Whether an absent segment, or one after it, is marked optional.
fn is_optional(segments: &[KeySegment]) -> bool {
    segments
        .iter()
        .any(|segment| matches!(segment, KeySegment::Name { optional: true, .. }))
}

/// Apply a rule to the value found at `key`.
fn apply(rule: &Rule, key: &str, value: &Value) -> Outcome {
    match rule {
        Rule::Accept(members) => accept(members, key, value),
        Rule::Call(handler) => invoke(handler, key, value),
        // elements are checked one by one in the leaf step
        Rule::Each(_) if value.is_array() => Outcome::Ok,
        Rule::Each(_) => Outcome::mismatch(vec![ValueKind::Array], value),
    }
}

/// Kind members first, then the first handler member.
fn accept(members: &[Member], key: &str, value: &Value) -> Outcome {
    let kind = ValueKind::of(value);
    let mut expected = Vec::new();
    let mut fallback = None;
    for member in members {
        match member {
            Member::Kind(accepted) if *accepted == kind => return Outcome::Ok,
            Member::Kind(accepted) => expected.push(*accepted),
            Member::Handler(handler) => {
                fallback.get_or_insert(handler);
            }
        }
    }
    match fallback {
        Some(handler) => invoke(handler, key, value),
        None => Outcome::mismatch(expected, value),
    }
}

fn invoke(handler: &Handler, key: &str, value: &Value) -> Outcome {
    match handler.call(key, value) {
        Ok(result) => Outcome::HandlerResult { result },
        Err(err) => {
            warn!("handler failed (path={}, error={:#})", key, err);
            Outcome::HandlerFailed {
                message: format!("{err:#}"),
            }
        }
    }
}
