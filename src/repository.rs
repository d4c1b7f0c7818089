//! Data repository trait for the primary datastore.
//!
//! The cache never owns data. When it needs an entity it cannot find in the
//! store (an `expire` whose query only names one index, or a `fetch` miss),
//! it asks a [`DataRepository`] to resolve the same attribute query.
//!
//! Implement it over SQLx, Diesel, tokio-postgres or any other client. For
//! tests, [`InMemoryRepository`] resolves queries by scanning its entities.
//!
//! When implementing the trait for a real database, return
//! `Error::RepositoryError` for connectivity issues, timeouts and other
//! storage failures; return `Ok(None)` when nothing matches.

use crate::entity::CacheEntity;
use crate::error::Result;
use crate::query::AttributeQuery;
use crate::value::AttributeValue;

/// Trait for primary datastore lookups.
#[allow(async_fn_in_trait)]
pub trait DataRepository<T: CacheEntity>: Send + Sync {
    /// Find the entity whose attributes equal every value in `query`.
    ///
    /// # Returns
    /// - `Ok(Some(entity))` - Entity found
    /// - `Ok(None)` - Entity not found (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn find_by(&self, query: &AttributeQuery) -> Result<Option<T>>;

    /// Find by primary key value.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn find_by_primary_key(&self, id: AttributeValue) -> Result<Option<T>> {
        self.find_by(&AttributeQuery::new().with(T::primary_key(), id))
            .await
    }
}

// ============================================================================
// In-Memory Test Repository
// ============================================================================

/// Simple in-memory repository for tests and demos.
///
/// Entities are keyed by their primary key value; inserting an entity with
/// an existing primary key replaces it.
pub struct InMemoryRepository<T: CacheEntity> {
    rows: Vec<T>,
}

impl<T: CacheEntity> InMemoryRepository<T> {
    pub fn new() -> Self {
        InMemoryRepository { rows: Vec::new() }
    }

    /// Insert or replace by primary key.
    pub fn insert(&mut self, entity: T) {
        let pk = entity.attribute(T::primary_key());
        match self
            .rows
            .iter_mut()
            .find(|row| pk.is_some() && row.attribute(T::primary_key()) == pk)
        {
            Some(row) => *row = entity,
            None => self.rows.push(entity),
        }
    }

    /// Remove by primary key, returning the removed entity.
    pub fn remove(&mut self, id: &AttributeValue) -> Option<T> {
        let position = self.rows.iter().position(|row| {
            row.attribute(T::primary_key())
                .is_some_and(|v| v.same_rendering(id))
        })?;
        Some(self.rows.remove(position))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: CacheEntity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CacheEntity> DataRepository<T> for InMemoryRepository<T> {
    async fn find_by(&self, query: &AttributeQuery) -> Result<Option<T>> {
        if query.is_empty() {
            return Ok(None);
        }
        Ok(self.rows.iter().find(|row| row.matches(query)).cloned())
    }
}
