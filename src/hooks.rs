//! Lifecycle hooks for the datastore write path.
//!
//! Call these after the primary store has committed a change:
//!
//! ```ignore
//! repo.insert(&user).await?;
//! coordinator.after_create(&user).await?;
//!
//! let previous = AttributeQuery::new().with("email", old_email);
//! repo.update(&user).await?;
//! coordinator.after_update(&user, &previous).await?;
//!
//! repo.delete(user.id).await?;
//! coordinator.after_destroy(&user).await?;
//! ```
//!
//! A hook failure means the cache may be stale, never that the datastore
//! change failed.

use crate::backend::CacheBackend;
use crate::coordinator::CacheCoordinator;
use crate::entity::CacheEntity;
use crate::error::Result;
use crate::index::covered_indexes;
use crate::key::{CacheKey, CacheKeyBuilder};
use crate::query::AttributeQuery;

impl<B: CacheBackend> CacheCoordinator<B> {
    /// Cache a newly persisted entity under all of its index keys.
    ///
    /// # Errors
    ///
    /// Errors from [`write`](Self::write).
    pub async fn after_create<T: CacheEntity>(&self, entity: &T) -> Result<()> {
        self.write(entity).await
    }

    /// Refresh the cache after an update.
    ///
    /// `previous` holds the pre-update values of the attributes that changed.
    /// Keys those old values rendered to are deleted together with the
    /// entity's current keys, then the entity is written under its current
    /// keys. Both steps always run, so a failed set leaves a miss behind
    /// rather than the pre-update snapshot.
    ///
    /// # Errors
    ///
    /// The first failure of the delete or the write fan-out.
    pub async fn after_update<T: CacheEntity>(
        &self,
        entity: &T,
        previous: &AttributeQuery,
    ) -> Result<()> {
        let set = self.registry().get::<T>()?;
        let current = CacheKeyBuilder::keys_for_entity(&set, entity);

        let before = entity.attributes().merged(previous);
        let stale: Vec<CacheKey> = covered_indexes(set.unique_indexes(), &before)
            .iter()
            .map(|matched| CacheKeyBuilder::build::<T>(matched, set.version()))
            .filter(|key| !current.contains(key))
            .collect();

        if !stale.is_empty() {
            debug!(
                "{}: update orphaned {} key(s), expiring",
                T::storage_name(),
                stale.len()
            );
        }

        let mut targets = stale;
        targets.extend(current);

        let expired = self.delete_keys(&targets).await;
        let written = self.write(entity).await;
        expired.and(written)
    }

    /// Drop every cached copy of a destroyed entity.
    ///
    /// # Errors
    ///
    /// Errors from [`expire_entity`](Self::expire_entity).
    pub async fn after_destroy<T: CacheEntity>(&self, entity: &T) -> Result<()> {
        self.expire_entity(entity).await
    }
}
