//! Cache key derivation.
//!
//! Key format:
//!
//! ```text
//! slc/{storage_name}/{name=value&name=value}/{version}/{fingerprint}
//! ```
//!
//! Pairs are sorted by attribute name, so the key does not depend on the
//! order in which a caller listed attributes. The fingerprint is the first
//! seven hex characters of the SHA-1 of the entity's type identity.

use crate::config::IndexSet;
use crate::entity::CacheEntity;
use crate::index::MatchedIndex;
use sha1::{Digest, Sha1};
use std::fmt;

/// Leading segment of every key written by this crate.
pub const NAMESPACE: &str = "slc";

/// Length of the type fingerprint segment.
pub const FINGERPRINT_LEN: usize = 7;

/// A rendered cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builder for cache keys.
///
/// Values are rendered verbatim, without escaping. A value containing `&` or
/// `=` can therefore render the same key as a different value combination of
/// a composite index, e.g. `name="x&status=y", status="z"` and
/// `name="x", status="y&status=z"`. Composite indexes over free-form text
/// should only be declared where such values cannot occur.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Render the key for a matched index of `T`.
    pub fn build<T: CacheEntity>(matched: &MatchedIndex, version: u32) -> CacheKey {
        Self::build_raw(
            T::storage_name(),
            matched
                .values()
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_string())),
            version,
            &Self::fingerprint(T::type_identity()),
        )
    }

    /// Render a key from its parts. Pairs may arrive in any order.
    pub fn build_raw<'a, I>(storage_name: &str, pairs: I, version: u32, fingerprint: &str) -> CacheKey
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut pairs: Vec<(&str, String)> = pairs.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let joined = pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        CacheKey(format!(
            "{}/{}/{}/{}/{}",
            NAMESPACE, storage_name, joined, version, fingerprint
        ))
    }

    /// First seven hex characters of SHA-1 over `identity`.
    pub fn fingerprint(identity: &str) -> String {
        let digest = Sha1::digest(identity.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(FINGERPRINT_LEN);
        hex
    }

    /// One key per declared index the entity can supply values for.
    ///
    /// Keys follow declaration order and are never repeated.
    pub fn keys_for_entity<T: CacheEntity>(set: &IndexSet, entity: &T) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = Vec::with_capacity(set.unique_indexes().len());
        for index in set.unique_indexes() {
            match MatchedIndex::from_entity(index, entity) {
                Some(matched) => {
                    let key = Self::build::<T>(&matched, set.version());
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                None => {
                    debug!(
                        "{}: entity has no value for index {}, skipped",
                        T::storage_name(),
                        index
                    );
                }
            }
        }
        keys
    }
}
