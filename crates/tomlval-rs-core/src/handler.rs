//! Caller-supplied validation handlers.

use crate::error::HandlerError;
use std::fmt;
use std::sync::Arc;
use toml::Value;

/// Result returned by a handler; `Err` is recorded as a handler failure.
pub type HandlerOutput = anyhow::Result<serde_json::Value>;

type Callback = dyn Fn(&str, &Value) -> HandlerOutput + Send + Sync;

/// Which of `(key, value)` a handler consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerShape {
    /// `fn()`
    Niladic,
    /// `fn(key)`
    Key,
    /// `fn(value)`
    Value,
    /// `fn(key, value)`
    KeyValue,
}

impl HandlerShape {
    /// Map a declared parameter list onto a shape.
    pub fn from_params(params: &[&str]) -> Result<Self, HandlerError> {
        match params {
            [] => Ok(HandlerShape::Niladic),
            ["key"] => Ok(HandlerShape::Key),
            ["value"] => Ok(HandlerShape::Value),
            [other] => Err(HandlerError::InvalidParameter(other.to_string())),
            ["key", "value"] => Ok(HandlerShape::KeyValue),
            [first, second] => Err(HandlerError::InvalidOrder(
                first.to_string(),
                second.to_string(),
            )),
            _ => Err(HandlerError::TooManyParameters(params.len())),
        }
    }

    /// Parameter names in declaration order.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            HandlerShape::Niladic => &[],
            HandlerShape::Key => &["key"],
            HandlerShape::Value => &["value"],
            HandlerShape::KeyValue => &["key", "value"],
        }
    }
}

/// A shaped, optionally named callback.
#[derive(Clone)]
pub struct Handler {
    shape: HandlerShape,
    name: Option<String>,
    callback: Arc<Callback>,
}

impl Handler {
    fn build(
        shape: HandlerShape,
        callback: impl Fn(&str, &Value) -> HandlerOutput + Send + Sync + 'static,
    ) -> Self {
        Self {
            shape,
            name: None,
            callback: Arc::new(callback),
        }
    }

    /// Handler that ignores the key and value, e.g. an unknown-key marker.
    pub fn niladic(f: impl Fn() -> HandlerOutput + Send + Sync + 'static) -> Self {
        Self::build(HandlerShape::Niladic, move |_, _| f())
    }

    /// Handler called with the matched path.
    pub fn by_key(f: impl Fn(&str) -> HandlerOutput + Send + Sync + 'static) -> Self {
        Self::build(HandlerShape::Key, move |key, _| f(key))
    }

    /// Handler called with the matched value.
    pub fn by_value(f: impl Fn(&Value) -> HandlerOutput + Send + Sync + 'static) -> Self {
        Self::build(HandlerShape::Value, move |_, value| f(value))
    }

    /// Handler called with the matched path and value.
    pub fn by_key_value(f: impl Fn(&str, &Value) -> HandlerOutput + Send + Sync + 'static) -> Self {
        Self::build(HandlerShape::KeyValue, f)
    }

    /// Handler whose shape comes from a declared parameter list.
    ///
    /// The callback always receives both arguments; the declared names only
    /// decide the shape and must be one of `()`, `(key)`, `(value)`, or
    /// `(key, value)`.
    pub fn with_params(
        params: &[&str],
        f: impl Fn(&str, &Value) -> HandlerOutput + Send + Sync + 'static,
    ) -> Result<Self, HandlerError> {
        let shape = HandlerShape::from_params(params)?;
        Ok(Self::build(shape, f))
    }

    /// Attach a display name used when describing the schema.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn shape(&self) -> HandlerShape {
        self.shape
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invoke the handler for a matched path.
    pub fn call(&self, key: &str, value: &Value) -> HandlerOutput {
        (self.callback)(key, value)
    }

    /// Human-readable signature: `lambda value` or `check_age(value)`.
    pub fn describe(&self) -> String {
        let params = self.shape.params().join(", ");
        match (&self.name, params.is_empty()) {
            (Some(name), _) => format!("{name}({params})"),
            (None, true) => "lambda".to_string(),
            (None, false) => format!("lambda {params}"),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("shape", &self.shape)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parameter_lists_map_to_shapes() {
        assert_eq!(HandlerShape::from_params(&[]), Ok(HandlerShape::Niladic));
        assert_eq!(HandlerShape::from_params(&["key"]), Ok(HandlerShape::Key));
        assert_eq!(HandlerShape::from_params(&["value"]), Ok(HandlerShape::Value));
        assert_eq!(
            HandlerShape::from_params(&["key", "value"]),
            Ok(HandlerShape::KeyValue)
        );
    }

    /// Unknown names, reversed order, and extra parameters are rejected.
    #[test]
    fn illegal_parameter_lists_are_rejected() {
        assert_eq!(
            HandlerShape::from_params(&["key1"]),
            Err(HandlerError::InvalidParameter("key1".to_string()))
        );
        assert_eq!(
            HandlerShape::from_params(&["value", "key"]),
            Err(HandlerError::InvalidOrder(
                "value".to_string(),
                "key".to_string()
            ))
        );
        assert_eq!(
            HandlerShape::from_params(&["key", "value", "extra"]),
            Err(HandlerError::TooManyParameters(3))
        );
    }

    #[test]
    fn typed_constructors_pass_the_declared_arguments() {
        let by_key = Handler::by_key(|key| Ok(json!(key)));
        let by_value = Handler::by_value(|value| Ok(json!(value.as_integer())));
        let value = Value::Integer(5);
        assert_eq!(by_key.call("a.b", &value).expect("key"), json!("a.b"));
        assert_eq!(by_value.call("a.b", &value).expect("value"), json!(5));
    }

    #[test]
    fn describes_lambdas_and_named_handlers() {
        let lambda = Handler::niladic(|| Ok(json!("invalid-key")));
        let named = Handler::by_value(|_| Ok(json!(true))).named("check_age");
        let pair = Handler::by_key_value(|_, _| Ok(json!(null)));
        assert_eq!(lambda.describe(), "lambda");
        assert_eq!(named.describe(), "check_age(value)");
        assert_eq!(pair.describe(), "lambda key, value");
    }
}
