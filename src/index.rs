//! Unique index declarations and query resolution.
//!
//! An entity type declares an ordered list of unique indexes. A caller's
//! [`AttributeQuery`] resolves to the **first** declared index whose
//! attributes are all present in the query, so declaration order is the
//! tie-break when several indexes could serve the same query.
//!
//! ```
//! use slcache::index::{match_index, UniqueIndex};
//! use slcache::AttributeQuery;
//!
//! let declared = vec![
//!     UniqueIndex::single("id"),
//!     UniqueIndex::single("email"),
//!     UniqueIndex::composite(["name", "status"]),
//! ];
//!
//! let query = AttributeQuery::new().with("id", 1i64).with("email", "a@x.com");
//! let matched = match_index(&declared, &query).unwrap();
//! assert_eq!(matched.index(), &declared[0]);
//! ```

use crate::entity::CacheEntity;
use crate::error::{Error, Result};
use crate::query::AttributeQuery;
use crate::value::AttributeValue;
use std::fmt;

/// Ordered list of attribute names that together identify one entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniqueIndex {
    attributes: Vec<String>,
}

impl UniqueIndex {
    /// Single-attribute index.
    pub fn single(name: impl Into<String>) -> Self {
        UniqueIndex {
            attributes: vec![name.into()],
        }
    }

    /// Multi-attribute index, in declared order.
    pub fn composite<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        UniqueIndex {
            attributes: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// True when every attribute of this index is a key of `query`.
    pub fn is_covered_by(&self, query: &AttributeQuery) -> bool {
        self.attributes.iter().all(|name| query.contains(name))
    }
}

impl fmt::Display for UniqueIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.attributes.join(", "))
    }
}

/// A declared index together with the values that select one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedIndex {
    index: UniqueIndex,
    values: Vec<(String, AttributeValue)>,
}

impl MatchedIndex {
    /// Extract the index values from a query that covers it.
    fn from_query(index: &UniqueIndex, query: &AttributeQuery) -> Option<Self> {
        let values = index
            .attributes
            .iter()
            .map(|name| query.get(name).map(|v| (name.clone(), v.clone())))
            .collect::<Option<Vec<_>>>()?;

        Some(MatchedIndex {
            index: index.clone(),
            values,
        })
    }

    /// Derive the index values from an entity's current attributes.
    ///
    /// Returns `None` when the entity has no value for one of the index
    /// attributes; such an index cannot address the entity.
    pub fn from_entity<T: CacheEntity>(index: &UniqueIndex, entity: &T) -> Option<Self> {
        let values = index
            .attributes
            .iter()
            .map(|name| entity.attribute(name).map(|v| (name.clone(), v)))
            .collect::<Option<Vec<_>>>()?;

        Some(MatchedIndex {
            index: index.clone(),
            values,
        })
    }

    pub fn index(&self) -> &UniqueIndex {
        &self.index
    }

    /// Values in the index's declared attribute order.
    pub fn values(&self) -> &[(String, AttributeValue)] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// True when `query` names no attribute outside this index.
    pub fn covers_exactly(&self, query: &AttributeQuery) -> bool {
        query.names().all(|name| self.get(name).is_some())
    }
}

/// Resolve `query` against the declared indexes.
///
/// Returns the first index, in declaration order, whose attributes are all
/// present in `query`. Extra query attributes never prevent a match.
///
/// # Errors
///
/// `Error::NoMatchingIndex` when no declared index is fully covered.
pub fn match_index(declared: &[UniqueIndex], query: &AttributeQuery) -> Result<MatchedIndex> {
    declared
        .iter()
        .find(|index| !index.is_empty() && index.is_covered_by(query))
        .and_then(|index| MatchedIndex::from_query(index, query))
        .ok_or_else(|| {
            Error::NoMatchingIndex(format!(
                "attributes [{}] cover none of {}",
                query.names().collect::<Vec<_>>().join(", "),
                declared
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            ))
        })
}

/// Every declared index fully covered by `query`, in declaration order.
pub fn covered_indexes(declared: &[UniqueIndex], query: &AttributeQuery) -> Vec<MatchedIndex> {
    declared
        .iter()
        .filter(|index| !index.is_empty())
        .filter_map(|index| MatchedIndex::from_query(index, query))
        .collect()
}
