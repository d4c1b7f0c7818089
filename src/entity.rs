//! Core entity trait that all cached entities must implement.

use crate::error::Result;
use crate::query::AttributeQuery;
use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};

/// Trait that all entities stored in the second-level cache must implement.
///
/// The entity side of the contract: it names its storage, lists the
/// attributes an index may refer to, and hands out current attribute values
/// so keys can be derived for every declared unique index.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use slcache::{AttributeValue, CacheEntity};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// pub struct Account {
///     pub id: i64,
///     pub login: String,
/// }
///
/// impl CacheEntity for Account {
///     fn storage_name() -> &'static str {
///         "accounts"
///     }
///
///     fn attribute_names() -> &'static [&'static str] {
///         &["id", "login"]
///     }
///
///     fn attribute(&self, name: &str) -> Option<AttributeValue> {
///         match name {
///             "id" => Some(self.id.into()),
///             "login" => Some(self.login.as_str().into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait CacheEntity:
    Send + Sync + Serialize + for<'de> Deserialize<'de> + Clone + 'static
{
    /// Stable storage name of the type (table or collection name).
    ///
    /// Second segment of every cache key: `slc/{storage_name}/...`
    fn storage_name() -> &'static str;

    /// Fully-qualified identity of the type.
    ///
    /// Hashed into the key fingerprint, so renaming or moving the type
    /// orphans all of its cached entries.
    fn type_identity() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Primary key attribute. Always a declared unique index.
    fn primary_key() -> &'static str {
        "id"
    }

    /// Every attribute name a unique index may reference.
    fn attribute_names() -> &'static [&'static str];

    /// Current value of an attribute, `None` if absent or unset.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Snapshot of all set attributes, in `attribute_names` order.
    fn attributes(&self) -> AttributeQuery {
        Self::attribute_names()
            .iter()
            .filter_map(|name| self.attribute(name).map(|v| (*name, v)))
            .collect()
    }

    /// Whether every attribute of `query` equals this entity's value.
    fn matches(&self, query: &AttributeQuery) -> bool {
        query.iter().all(|(name, expected)| {
            self.attribute(name)
                .is_some_and(|actual| actual.same_rendering(expected))
        })
    }

    /// Serialize entity for cache storage.
    ///
    /// See `crate::serialization` for the envelope format.
    fn serialize_for_cache(&self) -> Result<Vec<u8>> {
        crate::serialization::serialize_for_cache(self)
    }

    /// Deserialize entity from cache storage.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidCacheEntry`: Bad magic or corrupted envelope
    /// - `Error::VersionMismatch`: Snapshot format changed
    /// - `Error::DeserializationError`: Corrupted payload
    fn deserialize_from_cache(bytes: &[u8]) -> Result<Self> {
        crate::serialization::deserialize_from_cache(bytes)
    }

    /// Optional: Validate entity after deserialization.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct TestEntity {
        id: i64,
        email: Option<String>,
    }

    impl CacheEntity for TestEntity {
        fn storage_name() -> &'static str {
            "tests"
        }

        fn attribute_names() -> &'static [&'static str] {
            &["id", "email"]
        }

        fn attribute(&self, name: &str) -> Option<AttributeValue> {
            match name {
                "id" => Some(self.id.into()),
                "email" => self.email.as_deref().map(AttributeValue::from),
                _ => None,
            }
        }
    }

    #[test]
    fn test_serialize_deserialize() {
        let entity = TestEntity {
            id: 1,
            email: Some("a@x.com".to_string()),
        };

        let bytes = entity.serialize_for_cache().unwrap();
        let deserialized = TestEntity::deserialize_from_cache(&bytes).unwrap();

        assert_eq!(entity, deserialized);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TestEntity::primary_key(), "id");
        assert!(TestEntity::type_identity().ends_with("TestEntity"));
    }

    #[test]
    fn test_attributes_skip_unset() {
        let entity = TestEntity { id: 7, email: None };
        let attrs = entity.attributes();

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("id"), Some(&AttributeValue::Int(7)));
    }

    #[test]
    fn test_matches() {
        let entity = TestEntity {
            id: 7,
            email: Some("a@x.com".to_string()),
        };

        assert!(entity.matches(&AttributeQuery::new().with("email", "a@x.com")));
        assert!(!entity.matches(&AttributeQuery::new().with("email", "b@x.com")));
        assert!(!entity.matches(&AttributeQuery::new().with("nick", "x")));
    }
}
