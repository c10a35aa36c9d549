//! Schema descriptions, structural validation, and the flattened key index.
//!
//! A schema is described as a tree of [`SchemaNode`]s, checked once at
//! construction, and then frozen into a sorted map from flattened key to the
//! [`Rule`] that applies there. Array-of-tables templates flatten to keys with
//! a `[]` segment (`items.[].id`); they are expanded against concrete indices
//! only while validating a document.

mod describe;


use crate::error::SchemaError;
use crate::handler::Handler;
use crate::kind::ValueKind;
use crate::pattern::{self, KeyPattern, KeySegment};
use crate::registry::Rule;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use toml::Table;

/// One acceptable member of a union or element template.
#[derive(Debug, Clone)]
pub enum Member {
    Kind(ValueKind),
    Handler(Handler),
}

impl Member {
    pub fn describe(&self) -> String {
        match self {
            Member::Kind(kind) => kind.name().to_string(),
            Member::Handler(handler) => handler.describe(),
        }
    }
}

impl From<ValueKind> for Member {
    fn from(kind: ValueKind) -> Self {
        Member::Kind(kind)
    }
}

impl From<Handler> for Member {
    fn from(handler: Handler) -> Self {
        Member::Handler(handler)
    }
}

/// Unvalidated schema description.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// A single expected kind.
    Kind(ValueKind),
    /// Any of several kinds; handler members run when no kind matches.
    Union(Vec<Member>),
    /// A handler invoked for the key.
    Handler(Handler),
    /// Nested table of fields.
    Table(BTreeMap<String, SchemaNode>),
    /// Array whose every element satisfies one of the members.
    Array(Vec<Member>),
    /// Array of tables; must hold exactly one table template.
    TableArray(Vec<SchemaNode>),
}

impl SchemaNode {
    /// Build a nested table from `(field, node)` pairs.
    pub fn table<K: Into<String>>(fields: impl IntoIterator<Item = (K, SchemaNode)>) -> Self {
        SchemaNode::Table(
            fields
                .into_iter()
                .map(|(key, node)| (key.into(), node))
                .collect(),
        )
    }

    pub fn union<M: Into<Member>>(members: impl IntoIterator<Item = M>) -> Self {
        SchemaNode::Union(members.into_iter().map(Into::into).collect())
    }

    pub fn array<M: Into<Member>>(members: impl IntoIterator<Item = M>) -> Self {
        SchemaNode::Array(members.into_iter().map(Into::into).collect())
    }

    /// Array-of-tables with a single table template.
    pub fn table_array(template: SchemaNode) -> Self {
        SchemaNode::TableArray(vec![template])
    }
}

impl From<ValueKind> for SchemaNode {
    fn from(kind: ValueKind) -> Self {
        SchemaNode::Kind(kind)
    }
}

impl From<Handler> for SchemaNode {
    fn from(handler: Handler) -> Self {
        SchemaNode::Handler(handler)
    }
}

/// One flattened schema key.
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pattern: KeyPattern,
    segments: Vec<KeySegment>,
    rule: Rule,
}

impl SchemaEntry {
    /// Normalized key (without `?` markers).
    pub fn key(&self) -> &str {
        self.pattern.key()
    }

    /// Key as written in the description.
    pub fn raw_key(&self) -> &str {
        self.pattern.raw()
    }

    pub fn pattern(&self) -> &KeyPattern {
        &self.pattern
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Whether the key must appear in every document (no `?`, no `*`).
    pub fn is_required(&self) -> bool {
        !self.pattern.has_wildcard()
            && self.segments.iter().all(|segment| {
                !matches!(segment, KeySegment::Name { optional: true, .. })
            })
    }

    pub(crate) fn segments(&self) -> &[KeySegment] {
        &self.segments
    }
}

/// A validated, immutable schema.
#[derive(Debug, Clone)]
pub struct Schema {
    raw: SchemaNode,
    entries: BTreeMap<String, SchemaEntry>,
}

impl Schema {
    /// Validate a description and build the flattened index.
    ///
    /// Every node is examined; the first problem in key order is returned.
    pub fn new(raw: SchemaNode) -> Result<Self, SchemaError> {
        let SchemaNode::Table(fields) = &raw else {
            return Err(SchemaError::new("", "schema must be a table"));
        };
        let mut builder = IndexBuilder::default();
        builder.table(fields, "");
        builder.check_nesting();
        if let Some(err) = builder.errors.into_iter().next() {
            return Err(err);
        }
        debug!("schema compiled (keys={})", builder.entries.len());
        Ok(Self {
            raw,
            entries: builder.entries,
        })
    }

    /// Build a schema from a TOML description.
    ///
    /// String leaves name a kind (`"int"`) or a union (`"int | float"`),
    /// arrays of names are element templates, an array holding one table is
    /// an array-of-tables template, and tables nest.
    pub fn from_toml(table: &Table) -> Result<Self, SchemaError> {
        Self::new(describe::describe_table(table, "")?)
    }

    /// The description the schema was built from.
    pub fn raw(&self) -> &SchemaNode {
        &self.raw
    }

    /// Normalized keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Look up a key; `?` markers in the argument are ignored.
    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.get(&key.replace('?', ""))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.entries.values().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{} = {}", entry.raw_key(), entry.rule.describe())?;
        }
        Ok(())
    }
}

/// Accumulates flattened entries and problems during validation.
#[derive(Default)]
struct IndexBuilder {
    entries: BTreeMap<String, SchemaEntry>,
    errors: Vec<SchemaError>,
}

impl IndexBuilder {
    /// Visit every field of a table.
    fn table(&mut self, fields: &BTreeMap<String, SchemaNode>, prefix: &str) {
        for (name, node) in fields {
            let key = join_key(prefix, name);
            match pattern::parse_segments(name) {
                Err(err) => self.reject(&key, err.to_string()),
                Ok(segments) if segments.iter().any(is_index) => {
                    self.reject(&key, "field names cannot contain index markers")
                }
                Ok(_) => self.node(node, &key),
            }
        }
    }

    /// Visit a single node at `key`.
    fn node(&mut self, node: &SchemaNode, key: &str) {
        match node {
            SchemaNode::Kind(kind) => self.entry(key, Rule::Accept(vec![Member::Kind(*kind)])),
            SchemaNode::Union(members) if members.is_empty() => {
                self.reject(key, "union must list at least one type or handler")
            }
            SchemaNode::Union(members) => self.entry(key, Rule::Accept(members.clone())),
            SchemaNode::Handler(handler) => self.entry(key, Rule::Call(handler.clone())),
            SchemaNode::Array(members) if members.is_empty() => {
                self.reject(key, "array must list at least one type or handler")
            }
            SchemaNode::Array(members) => self.entry(key, Rule::Each(members.clone())),
            SchemaNode::Table(fields) => self.table(fields, key),
            SchemaNode::TableArray(templates) => match templates.as_slice() {
                [SchemaNode::Table(fields)] => self.table(fields, &format!("{key}.[]")),
                [] => self.reject(key, "array-of-tables template is empty"),
                [_] => self.reject(key, "array-of-tables template must be a table"),
                _ => self.reject(key, "array-of-tables must hold exactly one table template"),
            },
        }
    }

    /// Record a leaf rule under its flattened key.
    fn entry(&mut self, key: &str, rule: Rule) {
        let parsed = pattern::parse_segments(key).and_then(|segments| {
            let pattern = KeyPattern::parse(key)?;
            let pattern = match rule {
                Rule::Each(_) => pattern.with_elements()?,
                _ => pattern,
            };
            Ok((pattern, segments))
        });
        let (pattern, segments) = match parsed {
            Ok(parsed) => parsed,
            Err(err) => return self.reject(key, err.to_string()),
        };
        let normalized = pattern.key().to_string();
        if self.entries.contains_key(&normalized) {
            return self.reject(key, format!("duplicate key '{normalized}'"));
        }
        self.entries.insert(
            normalized,
            SchemaEntry {
                pattern,
                segments,
                rule,
            },
        );
    }

    /// Reject literal keys that are also the parent of another key.
    fn check_nesting(&mut self) {
        let conflicts: Vec<(String, String)> = self
            .entries
            .keys()
            .filter(|key| !key.contains('*'))
            .filter_map(|key| {
                let parent = format!("{key}.");
                let (child, _) = self.entries.range(parent.clone()..).next()?;
                child
                    .starts_with(&parent)
                    .then(|| (key.clone(), child.clone()))
            })
            .collect();
        for (key, child) in conflicts {
            self.reject(&key, format!("key is both a value and the parent of '{child}'"));
        }
    }

    fn reject(&mut self, key: &str, message: impl Into<String>) {
        let err = SchemaError::new(key, message);
        debug!("schema problem: {err}");
        self.errors.push(err);
    }
}

fn is_index(segment: &KeySegment) -> bool {
    !matches!(segment, KeySegment::Name { .. })
}

/// Join nested keys with a dot.
fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
