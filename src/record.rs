//! Structured records keyed by field name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::field::Value;

/// A decoded record: field name to value, kept in insertion order.
///
/// Records read from a line list their fields in layout order. Equality
/// ignores order.
///
/// A record carries no layout; the [`Layout`](crate::Layout) that produced
/// or consumes it defines what its keys mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, returning the previous one for that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_iter() {
        let record: Record = [("a", Value::from("xxx")), ("b", Value::from(4))]
            .into_iter()
            .collect();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("b"), Some(&Value::Int(4)));
        assert!(!record.contains("c"));
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let record = Record::new().with("z", 1).with("a", "x").with("m", 2);
        let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"z":1,"a":"x","m":2}"#
        );
        assert_eq!(record, Record::new().with("a", "x").with("m", 2).with("z", 1));
    }

    #[test]
    fn test_record_json_shape() {
        let record = Record::new().with("a", "xxx").with("b", 42);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"a":"xxx","b":42}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
