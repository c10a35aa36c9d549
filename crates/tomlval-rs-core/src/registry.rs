//! Pattern-keyed rule registry with most-specific-match resolution.

use crate::error::{FormatError, HandlerError, TomlvalError};
use crate::handler::{Handler, HandlerOutput};
use crate::kind::ValueKind;
use crate::pattern::KeyPattern;
use crate::schema::Member;
use log::debug;
use std::collections::HashMap;
use toml::Value;

/// Check applied to a path resolved to a registry entry.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The value kind must be one of the kind members; handler members
    /// are consulted when no kind matches.
    Accept(Vec<Member>),
    /// Invoke a handler.
    Call(Handler),
    /// The value must be an array whose elements satisfy the members.
    Each(Vec<Member>),
}

impl Rule {
    /// Human-readable form: `str`, `(int, float)`, `[int]`, `lambda value`.
    pub fn describe(&self) -> String {
        let list = |members: &[Member]| {
            members
                .iter()
                .map(Member::describe)
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Rule::Accept(members) if members.len() == 1 => members[0].describe(),
            Rule::Accept(members) => format!("({})", list(members)),
            Rule::Call(handler) => handler.describe(),
            Rule::Each(members) => format!("[{}]", list(members)),
        }
    }
}

impl From<ValueKind> for Rule {
    fn from(kind: ValueKind) -> Self {
        Rule::Accept(vec![Member::Kind(kind)])
    }
}

impl From<Handler> for Rule {
    fn from(handler: Handler) -> Self {
        Rule::Call(handler)
    }
}

/// A registered pattern and its rule.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pattern: KeyPattern,
    rule: Rule,
}

impl RegistryEntry {
    pub(crate) fn new(pattern: KeyPattern, rule: Rule) -> Self {
        Self { pattern, rule }
    }

    pub fn pattern(&self) -> &KeyPattern {
        &self.pattern
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

/// Rules keyed by path pattern.
///
/// Literal patterns are found by exact lookup; everything else is scanned
/// and ranked by specificity, with the earliest registration winning ties.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    entries: Vec<RegistryEntry>,
    by_key: HashMap<String, usize>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule under a pattern string.
    ///
    /// Re-registering the same normalized pattern replaces the previous rule
    /// in place.
    pub fn register(&mut self, pattern: &str, rule: impl Into<Rule>) -> Result<(), FormatError> {
        let pattern = KeyPattern::parse(pattern)?;
        self.insert(pattern, rule.into())
    }

    /// Register a callback whose shape comes from a declared parameter list.
    ///
    /// Nothing is registered when the pattern or the parameter list is
    /// invalid.
    pub fn register_with_params(
        &mut self,
        pattern: &str,
        params: &[&str],
        f: impl Fn(&str, &Value) -> HandlerOutput + Send + Sync + 'static,
    ) -> Result<(), TomlvalError> {
        let pattern = KeyPattern::parse(pattern)?;
        let handler = Handler::with_params(params, f).map_err(|err: HandlerError| {
            debug!("rejected handler (pattern={}, error={})", pattern, err);
            err
        })?;
        self.insert(pattern, Rule::Call(handler))?;
        Ok(())
    }

    /// Insert a compiled pattern, widening it for element rules.
    pub(crate) fn insert(&mut self, pattern: KeyPattern, rule: Rule) -> Result<(), FormatError> {
        if matches!(&rule, Rule::Accept(members) | Rule::Each(members) if members.is_empty()) {
            return Err(FormatError::EmptyRule {
                key: pattern.raw().to_string(),
            });
        }
        let pattern = match rule {
            Rule::Each(_) => pattern.with_elements()?,
            _ => pattern,
        };
        self.put(RegistryEntry::new(pattern, rule));
        Ok(())
    }

    /// Insert an entry whose pattern is already scoped for its rule.
    pub(crate) fn put(&mut self, entry: RegistryEntry) {
        let key = entry.pattern.key().to_string();
        debug!(
            "registering rule (pattern={}, rule={})",
            key,
            entry.rule.describe()
        );
        match self.by_key.get(&key) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.by_key.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Find the single best entry for a concrete path.
    pub fn resolve(&self, path: &str) -> Option<&RegistryEntry> {
        if let Some(&idx) = self.by_key.get(path) {
            let entry = &self.entries[idx];
            if entry.pattern.matches(path) {
                return Some(entry);
            }
        }
        let mut best: Option<&RegistryEntry> = None;
        for entry in &self.entries {
            if entry.pattern.is_exact_literal() || !entry.pattern.matches(path) {
                continue;
            }
            let better = best.is_none_or(|current| {
                entry.pattern.specificity() > current.pattern.specificity()
            });
            if better {
                best = Some(entry);
            }
        }
        best
    }

    /// Resolve a path straight to its rule.
    pub fn resolve_rule(&self, path: &str) -> Option<&Rule> {
        self.resolve(path).map(RegistryEntry::rule)
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tagged(tag: &'static str) -> Handler {
        Handler::niladic(move || Ok(json!(tag)))
    }

    fn resolved_tag(registry: &HandlerRegistry, path: &str) -> Option<serde_json::Value> {
        match registry.resolve_rule(path)? {
            Rule::Call(handler) => handler.call(path, &Value::Boolean(true)).ok(),
            _ => None,
        }
    }

    /// A literal pattern wins over a wildcard regardless of order.
    #[test]
    fn literal_beats_wildcard() {
        for order in [["a.*", "a.b"], ["a.b", "a.*"]] {
            let mut registry = HandlerRegistry::new();
            for pattern in order {
                registry.register(pattern, tagged(pattern)).expect("register");
            }
            assert_eq!(resolved_tag(&registry, "a.b"), Some(json!("a.b")));
            assert_eq!(resolved_tag(&registry, "a.c"), Some(json!("a.*")));
        }
    }

    /// The catch-all only applies when nothing more specific matches.
    #[test]
    fn catch_all_is_the_fallback() {
        let mut registry = HandlerRegistry::new();
        registry.register("*", tagged("*")).expect("register");
        registry.register("*_name", tagged("*_name")).expect("register");
        assert_eq!(resolved_tag(&registry, "first_name"), Some(json!("*_name")));
        assert_eq!(resolved_tag(&registry, "age"), Some(json!("*")));
    }

    /// Equal specificity resolves to the first registration, every time.
    #[test]
    fn ties_go_to_first_registration() {
        let mut registry = HandlerRegistry::new();
        registry.register("a*c", tagged("first")).expect("register");
        registry.register("*bc", tagged("second")).expect("register");
        for _ in 0..3 {
            assert_eq!(resolved_tag(&registry, "abc"), Some(json!("first")));
        }
    }

    /// Fewer wildcards wins between equally literal patterns.
    #[test]
    fn fewer_wildcards_break_literal_ties() {
        let mut registry = HandlerRegistry::new();
        registry.register("a*b*", tagged("two")).expect("register");
        registry.register("a*b", tagged("one")).expect("register");
        assert_eq!(resolved_tag(&registry, "axb"), Some(json!("one")));
    }

    #[test]
    fn re_registration_overwrites_in_place() {
        let mut registry = HandlerRegistry::new();
        registry.register("a", tagged("old")).expect("register");
        registry.register("a?", tagged("new")).expect("register");
        assert_eq!(registry.len(), 1);
        assert_eq!(resolved_tag(&registry, "a"), Some(json!("new")));
    }

    /// A rejected handler leaves the registry untouched.
    #[test]
    fn rejected_handler_is_not_registered() {
        let mut registry = HandlerRegistry::new();
        registry.register("a.*", tagged("before")).expect("register");
        let reversed = registry.register_with_params("a.b", &["value", "key"], |_, _| Ok(json!(1)));
        assert!(matches!(reversed, Err(TomlvalError::Handler(_))));
        let wide = registry.register_with_params("a.*", &["key", "value", "x"], |_, _| {
            Ok(json!(2))
        });
        assert!(matches!(
            wide,
            Err(TomlvalError::Handler(HandlerError::TooManyParameters(3)))
        ));
        assert_eq!(registry.len(), 1);
        assert_eq!(resolved_tag(&registry, "a.b"), Some(json!("before")));
    }

    #[test]
    fn invalid_patterns_are_format_errors() {
        let mut registry = HandlerRegistry::new();
        let err = registry.register("a..b", ValueKind::String).unwrap_err();
        assert!(matches!(err, FormatError::InvalidKey { .. }));
        assert!(registry.is_empty());
    }

    /// Rules with no members are refused and leave the registry untouched.
    #[test]
    fn empty_member_lists_are_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.register("port", ValueKind::Integer).expect("register");
        for rule in [Rule::Accept(Vec::new()), Rule::Each(Vec::new())] {
            let err = registry.register("port", rule).unwrap_err();
            assert_eq!(
                err,
                FormatError::EmptyRule {
                    key: "port".to_string()
                }
            );
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve_rule("port").map(Rule::describe), Some("int".to_string()));
    }

    /// Element rules cover the key and the positions below it.
    #[test]
    fn element_rules_match_positions() {
        let mut registry = HandlerRegistry::new();
        registry
            .insert(
                KeyPattern::parse("nums").expect("pattern"),
                Rule::Each(vec![Member::Kind(ValueKind::Integer)]),
            )
            .expect("insert");
        assert!(registry.resolve("nums").is_some());
        assert!(registry.resolve("nums.[4]").is_some());
        assert!(registry.resolve("numsx").is_none());
    }
}
