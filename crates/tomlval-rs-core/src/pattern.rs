//! Key grammar, wildcard matching, and specificity ordering.
//!
//! A pattern is a dotted key whose segments may contain `*` (any substring,
//! including across segment boundaries) and `[]` (any sequence index). A
//! trailing `?` on a segment marks it optional and is stripped before
//! matching.

use crate::error::FormatError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// Tie-break score for overlapping patterns.
///
/// Higher `literal` wins; on a tie, fewer `wildcards` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specificity {
    /// Characters that are not `*`.
    pub literal: usize,
    /// Number of `*` wildcards.
    pub wildcards: usize,
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal
            .cmp(&other.literal)
            .then_with(|| other.wildcards.cmp(&self.wildcards))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Score a pattern string (the `?` markers are ignored).
pub fn specificity(pattern: &str) -> Specificity {
    let normalized = pattern.replace('?', "");
    let wildcards = normalized.chars().filter(|ch| *ch == '*').count();
    Specificity {
        literal: normalized.chars().count() - wildcards,
        wildcards,
    }
}

/// Check whether `pattern` matches the concrete `path`.
pub fn matches(pattern: &str, path: &str) -> Result<bool, FormatError> {
    Ok(KeyPattern::parse(pattern)?.matches(path))
}

/// One parsed segment of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeySegment {
    /// Field name or wildcard body, with its optional marker.
    Name { body: String, optional: bool },
    /// Concrete index `[n]`.
    Index(usize),
    /// Template index `[]`.
    AnyIndex,
}

impl KeySegment {
    pub(crate) fn has_wildcard(&self) -> bool {
        matches!(self, KeySegment::Name { body, .. } if body.contains('*'))
    }
}

/// Parse and check a raw key against the grammar.
pub(crate) fn parse_segments(raw: &str) -> Result<Vec<KeySegment>, FormatError> {
    if raw.is_empty() {
        return Err(FormatError::invalid_key(raw, "key is empty"));
    }
    if raw.contains("**") {
        return Err(FormatError::invalid_key(raw, "consecutive wildcards"));
    }
    raw.split('.')
        .map(|part| parse_segment(raw, part))
        .collect()
}

fn parse_segment(raw: &str, part: &str) -> Result<KeySegment, FormatError> {
    if part.is_empty() {
        return Err(FormatError::invalid_key(raw, "empty segment"));
    }
    if part == "[]" {
        return Ok(KeySegment::AnyIndex);
    }
    if let Some(digits) = part.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        return digits
            .parse::<usize>()
            .map(KeySegment::Index)
            .map_err(|_| {
                FormatError::invalid_key(raw, format!("invalid index marker '{part}'"))
            });
    }
    let (body, optional) = match part.strip_suffix('?') {
        Some(body) => (body, true),
        None => (part, false),
    };
    if body.is_empty() {
        return Err(FormatError::invalid_key(raw, "'?' must follow a name"));
    }
    if optional && body.ends_with('*') {
        return Err(FormatError::invalid_key(raw, "'*' cannot precede '?'"));
    }
    if let Some(ch) = body
        .chars()
        .find(|ch| !(ch.is_alphanumeric() || *ch == '_' || *ch == '*'))
    {
        return Err(FormatError::invalid_key(
            raw,
            format!("unexpected character '{ch}' in segment '{part}'"),
        ));
    }
    Ok(KeySegment::Name {
        body: body.to_string(),
        optional,
    })
}

/// Render segments without optional markers.
pub(crate) fn normalize(segments: &[KeySegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            KeySegment::Name { body, .. } => body.clone(),
            KeySegment::Index(idx) => format!("[{idx}]"),
            KeySegment::AnyIndex => "[]".to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// How far below its key a pattern reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Only the key itself.
    Exact,
    /// The key and any element path `key.[n]...` below it.
    Elements,
}

/// A compiled key pattern.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    raw: String,
    key: String,
    literal: bool,
    regex: Regex,
    scope: Scope,
}

impl KeyPattern {
    /// Parse a key, validating it against the grammar.
    pub fn parse(raw: &str) -> Result<Self, FormatError> {
        let segments = parse_segments(raw)?;
        Self::compile(raw, &segments, Scope::Exact)
    }

    /// Compile already-validated segments.
    fn compile(raw: &str, segments: &[KeySegment], scope: Scope) -> Result<Self, FormatError> {
        let body = segments
            .iter()
            .map(|segment| match segment {
                KeySegment::Name { body, .. } => body
                    .split('*')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(".*?"),
                KeySegment::Index(idx) => format!(r"\[{idx}\]"),
                KeySegment::AnyIndex => r"\[\d+\]".to_string(),
            })
            .collect::<Vec<_>>()
            .join(r"\.");
        let source = match scope {
            Scope::Exact => format!("^{body}$"),
            Scope::Elements => format!(r"^{body}(?P<rest>\.\[\d+\](?:\..*)?)?$"),
        };
        let regex =
            Regex::new(&source).map_err(|err| FormatError::invalid_key(raw, err.to_string()))?;
        let literal = segments
            .iter()
            .all(|segment| !segment.has_wildcard() && *segment != KeySegment::AnyIndex);
        Ok(Self {
            raw: raw.to_string(),
            key: normalize(segments),
            literal,
            regex,
            scope,
        })
    }

    /// Widen the pattern to also match element paths `key.[n]...`.
    pub(crate) fn with_elements(&self) -> Result<Self, FormatError> {
        let segments = parse_segments(&self.raw)?;
        Self::compile(&self.raw, &segments, Scope::Elements)
    }

    /// The key as written, including `?` markers.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The key with `?` markers stripped.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the key contains neither `*` nor `[]`.
    pub fn is_literal(&self) -> bool {
        self.literal
    }

    /// Whether the key contains a `*` wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.key.contains('*')
    }

    /// Whether an exact dictionary lookup on [`Self::key`] finds every match.
    pub(crate) fn is_exact_literal(&self) -> bool {
        self.literal && self.scope == Scope::Exact
    }

    pub fn specificity(&self) -> Specificity {
        specificity(&self.key)
    }

    /// Check the pattern against a concrete path string.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// For element-scoped patterns, the `key.[n]` prefix of a matching path.
    pub(crate) fn element_prefix<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = self.regex.captures(path)?.name("rest")?;
        let close = path[rest.start()..].find(']')?;
        Some(&path[..rest.start() + close + 1])
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
