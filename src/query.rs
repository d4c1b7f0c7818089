//! Attribute queries: the caller's view of "which entity".

use crate::value::AttributeValue;

/// Insertion-ordered mapping from attribute name to value.
///
/// A query need not match any declared unique index. Re-inserting an
/// attribute replaces its value in place, so order reflects first insertion.
///
/// # Example
///
/// ```
/// use slcache::AttributeQuery;
///
/// let query = AttributeQuery::new()
///     .with("name", "foobar")
///     .with("status", slcache::AttributeValue::enumeration("active"));
///
/// assert_eq!(query.len(), 2);
/// assert!(query.contains("status"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeQuery {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeQuery {
    pub fn new() -> Self {
        AttributeQuery {
            entries: Vec::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an attribute value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Overlay `other` on top of this query, replacing shared attributes.
    pub fn merged(&self, other: &AttributeQuery) -> AttributeQuery {
        let mut merged = self.clone();
        for (name, value) in other.iter() {
            merged.insert(name, value.clone());
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeQuery
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = AttributeQuery::new();
        for (name, value) in iter {
            query.insert(name, value);
        }
        query
    }
}
