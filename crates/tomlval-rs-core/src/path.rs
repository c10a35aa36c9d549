//! Concrete dotted paths into nested documents.

use crate::error::FormatError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Table field name.
    Field(String),
    /// Zero-based sequence position, rendered as `[n]`.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Index(idx) => write!(f, "[{idx}]"),
        }
    }
}

/// Location of a value inside a document, e.g. `a.b.[0].c`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path (document root).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend the path with a field name.
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name.to_string()));
        Self(segments)
    }

    /// Extend the path with a sequence index.
    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(idx));
        Self(segments)
    }

    /// The path's segments, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first `len` segments.
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('.')
            .map(|part| parse_segment(s, part))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Parse one dotted component of a concrete path.
fn parse_segment(path: &str, part: &str) -> Result<Segment, FormatError> {
    if part.is_empty() {
        return Err(FormatError::invalid_path(path, "empty segment"));
    }
    if let Some(inner) = part.strip_prefix('[') {
        let Some(digits) = inner.strip_suffix(']') else {
            return Err(FormatError::invalid_path(path, "unterminated index"));
        };
        return digits
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| FormatError::invalid_path(path, format!("invalid index '{part}'")));
    }
    if part.contains(['[', ']']) {
        return Err(FormatError::invalid_path(
            path,
            format!("unexpected bracket in '{part}'"),
        ));
    }
    Ok(Segment::Field(part.to_string()))
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, Segment};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_and_parses_canonical_form() {
        let path = Path::root().field("a").field("b").index(0).field("c");
        assert_eq!(path.to_string(), "a.b.[0].c");
        assert_eq!("a.b.[0].c".parse::<Path>(), Ok(path));
    }

    #[test]
    fn rejects_malformed_segments() {
        assert!("a..b".parse::<Path>().is_err());
        assert!("a.[x]".parse::<Path>().is_err());
        assert!("a.[1".parse::<Path>().is_err());
        assert!("a[1]".parse::<Path>().is_err());
    }

    #[test]
    fn orders_indices_numerically() {
        let two = Path::root().field("a").index(2);
        let ten = Path::root().field("a").index(10);
        assert!(two < ten);
        assert_eq!(ten.segments()[1], Segment::Index(10));
    }
}
