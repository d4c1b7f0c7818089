//! Per-type cache configuration: key version, TTL and unique indexes.
//!
//! An [`IndexSet`] is declared once per entity type, either in code through
//! [`IndexSet::builder`] or from a JSON declaration:
//!
//! ```
//! use slcache::config::IndexSet;
//! use std::time::Duration;
//!
//! let set = IndexSet::from_json(
//!     r#"{"version": 3, "expires_in_secs": 259200,
//!         "unique_indexes": ["id", "email", ["name", "status"]]}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(set.version(), 3);
//! assert_eq!(set.ttl(), Some(Duration::from_secs(259_200)));
//! assert_eq!(set.unique_indexes().len(), 3);
//! ```
//!
//! Declarations are checked against the entity type when registered in an
//! [`IndexRegistry`](crate::registry::IndexRegistry); see
//! [`IndexSet::resolve_for`].

use crate::entity::CacheEntity;
use crate::error::{Error, Result};
use crate::index::UniqueIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Key version used when a declaration does not name one.
pub const DEFAULT_VERSION: u32 = 1;

/// Cache configuration for one entity type.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexSet {
    version: u32,
    ttl: Option<Duration>,
    unique_indexes: Vec<UniqueIndex>,
}

impl IndexSet {
    pub fn builder() -> IndexSetBuilder {
        IndexSetBuilder::default()
    }

    /// Parse a JSON declaration.
    ///
    /// # Errors
    ///
    /// `Error::ConfigError` if the document is not a valid declaration.
    pub fn from_json(json: &str) -> Result<Self> {
        let declaration: IndexSetDeclaration = serde_json::from_str(json)?;
        Ok(declaration.into())
    }

    /// Cache-key version. Bumping it orphans every existing key of the type.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// TTL applied to every entry written for the type.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Declared unique indexes, in declaration order.
    pub fn unique_indexes(&self) -> &[UniqueIndex] {
        &self.unique_indexes
    }

    /// Validate against `T` and make its primary key a declared index.
    ///
    /// The primary key index is prepended when the declaration omits it, so
    /// an entity is always addressable by primary key.
    ///
    /// # Errors
    ///
    /// `Error::MisconfiguredIndex` when an index is empty, repeats an
    /// attribute, or names an attribute `T` does not declare.
    pub fn resolve_for<T: CacheEntity>(mut self) -> Result<Self> {
        let known: HashSet<&str> = T::attribute_names().iter().copied().collect();
        let pk = T::primary_key();

        if !known.contains(pk) {
            return Err(Error::MisconfiguredIndex(format!(
                "{}: primary key `{}` is not a declared attribute",
                T::storage_name(),
                pk
            )));
        }

        for index in &self.unique_indexes {
            if index.is_empty() {
                return Err(Error::MisconfiguredIndex(format!(
                    "{}: empty unique index",
                    T::storage_name()
                )));
            }

            let mut seen = HashSet::new();
            for name in index.attributes() {
                if !known.contains(name.as_str()) {
                    return Err(Error::MisconfiguredIndex(format!(
                        "{}: index {} references unknown attribute `{}`",
                        T::storage_name(),
                        index,
                        name
                    )));
                }
                if !seen.insert(name.as_str()) {
                    return Err(Error::MisconfiguredIndex(format!(
                        "{}: index {} repeats attribute `{}`",
                        T::storage_name(),
                        index,
                        name
                    )));
                }
            }
        }

        let pk_index = UniqueIndex::single(pk);
        if !self.unique_indexes.contains(&pk_index) {
            self.unique_indexes.insert(0, pk_index);
        }

        // later duplicates can never win a match
        let mut seen = HashSet::new();
        self.unique_indexes.retain(|index| seen.insert(index.clone()));

        Ok(self)
    }
}

impl Default for IndexSet {
    fn default() -> Self {
        IndexSet::builder().build()
    }
}

/// Builder for [`IndexSet`].
#[derive(Clone, Debug)]
pub struct IndexSetBuilder {
    version: u32,
    ttl: Option<Duration>,
    unique_indexes: Vec<UniqueIndex>,
}

impl Default for IndexSetBuilder {
    fn default() -> Self {
        IndexSetBuilder {
            version: DEFAULT_VERSION,
            ttl: None,
            unique_indexes: Vec::new(),
        }
    }
}

impl IndexSetBuilder {
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Declare a single-attribute unique index.
    pub fn unique_index(mut self, name: impl Into<String>) -> Self {
        self.unique_indexes.push(UniqueIndex::single(name));
        self
    }

    /// Declare a multi-attribute unique index.
    pub fn composite_index<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_indexes.push(UniqueIndex::composite(names));
        self
    }

    pub fn build(self) -> IndexSet {
        IndexSet {
            version: self.version,
            ttl: self.ttl,
            unique_indexes: self.unique_indexes,
        }
    }
}

/// Serialized form of an [`IndexSet`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IndexSetDeclaration {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub expires_in_secs: Option<u64>,
    #[serde(default)]
    pub unique_indexes: Vec<IndexDeclaration>,
}

/// A single attribute name or an ordered list of names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IndexDeclaration {
    Single(String),
    Composite(Vec<String>),
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

impl From<IndexDeclaration> for UniqueIndex {
    fn from(declaration: IndexDeclaration) -> Self {
        match declaration {
            IndexDeclaration::Single(name) => UniqueIndex::single(name),
            IndexDeclaration::Composite(names) => UniqueIndex::composite(names),
        }
    }
}

impl From<IndexSetDeclaration> for IndexSet {
    fn from(declaration: IndexSetDeclaration) -> Self {
        IndexSet {
            version: declaration.version,
            ttl: declaration.expires_in_secs.map(Duration::from_secs),
            unique_indexes: declaration
                .unique_indexes
                .into_iter()
                .map(UniqueIndex::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AttributeValue;

    #[derive(Clone, Serialize, Deserialize)]
    struct Namespace {
        id: i64,
        user_id: i64,
        name: String,
    }

    impl CacheEntity for Namespace {
        fn storage_name() -> &'static str {
            "namespaces"
        }

        fn attribute_names() -> &'static [&'static str] {
            &["id", "user_id", "name"]
        }

        fn attribute(&self, name: &str) -> Option<AttributeValue> {
            match name {
                "id" => Some(self.id.into()),
                "user_id" => Some(self.user_id.into()),
                "name" => Some(self.name.as_str().into()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_builder_defaults() {
        let set = IndexSet::builder().build();
        assert_eq!(set.version(), DEFAULT_VERSION);
        assert_eq!(set.ttl(), None);
        assert!(set.unique_indexes().is_empty());
    }

    #[test]
    fn test_primary_key_prepended() {
        let set = IndexSet::builder()
            .composite_index(["user_id", "name"])
            .build()
            .resolve_for::<Namespace>()
            .unwrap();

        assert_eq!(
            set.unique_indexes(),
            &[
                UniqueIndex::single("id"),
                UniqueIndex::composite(["user_id", "name"])
            ]
        );
    }

    #[test]
    fn test_declared_primary_key_keeps_position() {
        let set = IndexSet::builder()
            .unique_index("name")
            .unique_index("id")
            .unique_index("name")
            .build()
            .resolve_for::<Namespace>()
            .unwrap();

        assert_eq!(
            set.unique_indexes(),
            &[UniqueIndex::single("name"), UniqueIndex::single("id")]
        );
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let err = IndexSet::builder()
            .unique_index("nickname")
            .build()
            .resolve_for::<Namespace>()
            .unwrap_err();
        assert!(matches!(err, Error::MisconfiguredIndex(_)));
    }

    #[test]
    fn test_empty_and_repeated_index_rejected() {
        let empty = IndexSet::builder()
            .composite_index(Vec::<String>::new())
            .build()
            .resolve_for::<Namespace>();
        assert!(matches!(empty, Err(Error::MisconfiguredIndex(_))));

        let repeated = IndexSet::builder()
            .composite_index(["name", "name"])
            .build()
            .resolve_for::<Namespace>();
        assert!(matches!(repeated, Err(Error::MisconfiguredIndex(_))));
    }

    #[test]
    fn test_json_declaration() {
        let set = IndexSet::from_json(r#"{"unique_indexes": [["user_id", "name"]]}"#).unwrap();
        assert_eq!(set.version(), DEFAULT_VERSION);
        assert_eq!(set.ttl(), None);
        assert_eq!(
            set.unique_indexes(),
            &[UniqueIndex::composite(["user_id", "name"])]
        );
    }

    #[test]
    fn test_json_declaration_invalid() {
        let err = IndexSet::from_json(r#"{"unique_indexes": [42]}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
