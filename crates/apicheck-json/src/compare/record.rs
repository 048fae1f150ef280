//! Uniform key/value view over the containers a comparison walks.

use serde_json::{Map, Value};

/// A JSON value seen as a record: objects are keyed by member name, lists by
/// position, and scalars expose no keys at all.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Record<'a> {
    Map(&'a Map<String, Value>),
    List(&'a [Value]),
    Empty,
}

impl<'a> Record<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(members) => Self::Map(members),
            Value::Array(items) => Self::List(items),
            _ => Self::Empty,
        }
    }

    pub(crate) fn keys(self) -> Vec<String> {
        match self {
            Self::Map(members) => members.keys().cloned().collect(),
            Self::List(items) => (0..items.len()).map(|index| index.to_string()).collect(),
            Self::Empty => Vec::new(),
        }
    }

    pub(crate) fn get(self, key: &str) -> Option<&'a Value> {
        match self {
            Self::Map(members) => members.get(key),
            Self::List(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
            Self::Empty => None,
        }
    }

    /// The first entry: the first list element or the first member value.
    pub(crate) fn first(self) -> Option<&'a Value> {
        match self {
            Self::Map(members) => members.values().next(),
            Self::List(items) => items.first(),
            Self::Empty => None,
        }
    }
}
