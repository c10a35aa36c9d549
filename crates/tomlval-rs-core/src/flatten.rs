//! Conversion between nested documents and single-level path maps.

use crate::error::FormatError;
use crate::path::{Path, Segment};
use std::collections::BTreeMap;
use toml::{Table, Value};

/// Flatten a table into a map from dotted paths to leaf values.
///
/// Tables emit `parent.child` paths and arrays emit `parent.[n]` paths.
/// Empty tables and arrays produce no entries.
pub fn flatten(table: &Table) -> BTreeMap<Path, Value> {
    let mut out = BTreeMap::new();
    for (key, value) in table {
        flatten_into(Path::root().field(key), value, &mut out);
    }
    out
}

/// Recursively collect leaves under `prefix`.
fn flatten_into(prefix: Path, value: &Value, out: &mut BTreeMap<Path, Value>) {
    match value {
        Value::Table(table) => {
            for (key, value) in table {
                flatten_into(prefix.field(key), value, out);
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                flatten_into(prefix.index(idx), item, out);
            }
        }
        leaf => {
            out.insert(prefix, leaf.clone());
        }
    }
}

/// Resolve a path inside a nested value.
pub fn lookup<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| match (segment, current) {
            (Segment::Field(name), Value::Table(table)) => table.get(name),
            (Segment::Index(idx), Value::Array(items)) => items.get(*idx),
            _ => None,
        })
}

/// Intermediate tree used while rebuilding a flattened map.
enum Draft {
    Leaf(Value),
    Table(BTreeMap<String, Draft>),
    Array(BTreeMap<usize, Draft>),
}

/// Rebuild a nested table from a flattened map.
///
/// Index segments become arrays when their indices run contiguously from
/// zero; anything else is reported as [`FormatError::SparseIndex`].
pub fn unflatten(flat: &BTreeMap<Path, Value>) -> Result<Table, FormatError> {
    let mut root = BTreeMap::new();
    for (path, value) in flat {
        let Some((Segment::Field(first), rest)) = path.segments().split_first() else {
            return Err(FormatError::invalid_path(
                &path.to_string(),
                "flattened paths must start with a field name",
            ));
        };
        let slot = root
            .entry(first.clone())
            .or_insert_with(|| empty_draft(rest.first()));
        insert_draft(slot, rest, value, &path.prefix(1), path)?;
    }
    let mut table = Table::new();
    for (key, draft) in root {
        let value = finish_draft(draft, &Path::root().field(&key))?;
        table.insert(key, value);
    }
    Ok(table)
}

/// Container matching the next segment, or a placeholder leaf at the end.
fn empty_draft(next: Option<&Segment>) -> Draft {
    match next {
        Some(Segment::Field(_)) => Draft::Table(BTreeMap::new()),
        Some(Segment::Index(_)) => Draft::Array(BTreeMap::new()),
        None => Draft::Table(BTreeMap::new()),
    }
}

/// Place `value` at `rest` below `slot`.
fn insert_draft(
    slot: &mut Draft,
    rest: &[Segment],
    value: &Value,
    at: &Path,
    full: &Path,
) -> Result<(), FormatError> {
    let Some((segment, tail)) = rest.split_first() else {
        return match slot {
            Draft::Table(map) if map.is_empty() => {
                *slot = Draft::Leaf(value.clone());
                Ok(())
            }
            _ => Err(FormatError::Conflict {
                path: full.to_string(),
            }),
        };
    };
    let child = match (segment, slot) {
        (Segment::Field(name), Draft::Table(map)) => map
            .entry(name.clone())
            .or_insert_with(|| empty_draft(tail.first())),
        (Segment::Index(idx), Draft::Array(map)) => {
            map.entry(*idx).or_insert_with(|| empty_draft(tail.first()))
        }
        _ => {
            return Err(FormatError::Conflict {
                path: at.to_string(),
            });
        }
    };
    let next = match segment {
        Segment::Field(name) => at.field(name),
        Segment::Index(idx) => at.index(*idx),
    };
    insert_draft(child, tail, value, &next, full)
}

/// Convert a finished draft into a document value.
fn finish_draft(draft: Draft, at: &Path) -> Result<Value, FormatError> {
    match draft {
        Draft::Leaf(value) => Ok(value),
        Draft::Table(map) => {
            let mut table = Table::new();
            for (key, child) in map {
                let value = finish_draft(child, &at.field(&key))?;
                table.insert(key, value);
            }
            Ok(Value::Table(table))
        }
        Draft::Array(map) => {
            let mut items = Vec::with_capacity(map.len());
            for (expected, (idx, child)) in map.into_iter().enumerate() {
                if idx != expected {
                    return Err(FormatError::SparseIndex {
                        path: at.to_string(),
                    });
                }
                items.push(finish_draft(child, &at.index(idx))?);
            }
            Ok(Value::Array(items))
        }
    }
}
