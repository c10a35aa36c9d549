//! Closed set of value kinds a schema can demand.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use toml::Value;

/// Runtime kind of a document value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Date and time, with or without an offset.
    Datetime,
    /// Local date without a time.
    Date,
    /// Local time without a date.
    Time,
    Array,
    Table,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 9] = [
        ValueKind::String,
        ValueKind::Integer,
        ValueKind::Float,
        ValueKind::Boolean,
        ValueKind::Datetime,
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::Array,
        ValueKind::Table,
    ];

    /// Classify a document value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Datetime(datetime) => match (&datetime.date, &datetime.time) {
                (Some(_), Some(_)) => ValueKind::Datetime,
                (Some(_), None) => ValueKind::Date,
                (None, _) => ValueKind::Time,
            },
            Value::Array(_) => ValueKind::Array,
            Value::Table(_) => ValueKind::Table,
        }
    }

    /// Short name used in schema descriptions and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "str",
            ValueKind::Integer => "int",
            ValueKind::Float => "float",
            ValueKind::Boolean => "bool",
            ValueKind::Datetime => "datetime",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::Array => "array",
            ValueKind::Table => "table",
        }
    }

    /// Whether values of this kind are flattened away rather than kept as leaves.
    pub fn is_container(self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Table)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown type '{s}'"))
    }
}

impl Serialize for ValueKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::ValueKind;
    use pretty_assertions::assert_eq;
    use toml::Value;

    fn parse(doc: &str) -> Value {
        toml::from_str::<toml::Table>(doc)
            .map(Value::Table)
            .expect("toml")
    }

    #[test]
    fn classifies_datetime_flavours() {
        let doc = parse(
            "full = 1979-05-27T07:32:00Z\nlocal = 1979-05-27T07:32:00\nday = 1979-05-27\nclock = 07:32:00",
        );
        let kind = |key: &str| ValueKind::of(&doc[key]);
        assert_eq!(kind("full"), ValueKind::Datetime);
        assert_eq!(kind("local"), ValueKind::Datetime);
        assert_eq!(kind("day"), ValueKind::Date);
        assert_eq!(kind("clock"), ValueKind::Time);
    }

    #[test]
    fn only_arrays_and_tables_are_containers() {
        let containers: Vec<ValueKind> = ValueKind::ALL
            .into_iter()
            .filter(|kind| kind.is_container())
            .collect();
        assert_eq!(containers, vec![ValueKind::Array, ValueKind::Table]);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in ValueKind::ALL {
            assert_eq!(kind.name().parse::<ValueKind>(), Ok(kind));
        }
        assert!("list".parse::<ValueKind>().is_err());
    }
}
