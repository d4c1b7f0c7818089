//! High-level cache service for web applications.
//!
//! Provides a convenient wrapper around CacheCoordinator with Arc for easy sharing.

use crate::backend::CacheBackend;
use crate::coordinator::CacheCoordinator;
use crate::entity::CacheEntity;
use crate::error::Result;
use crate::observability::CacheMetrics;
use crate::query::AttributeQuery;
use crate::registry::IndexRegistry;
use crate::repository::DataRepository;
use std::sync::Arc;

/// High-level cache service for web applications.
///
/// Wraps [`CacheCoordinator`] in `Arc` so it can be cloned into request
/// handlers and spawned tasks. Cloning is an `Arc` increment; every clone
/// shares one backend and one registry.
///
/// # Example
///
/// ```ignore
/// use slcache::{CacheService, IndexRegistry, IndexSet, AttributeQuery};
/// use slcache::backend::InMemoryBackend;
/// use std::sync::Arc;
///
/// let registry = Arc::new(IndexRegistry::new());
/// registry.register::<User>(IndexSet::builder().unique_index("email").build())?;
///
/// let cache = CacheService::new(InMemoryBackend::new(), registry);
///
/// let handler_cache = cache.clone();
/// tokio::spawn(async move {
///     let user: Option<User> = handler_cache
///         .read(&AttributeQuery::new().with("email", "a@x.com"))
///         .await?;
///     Ok::<_, slcache::Error>(())
/// });
/// ```
#[derive(Clone)]
pub struct CacheService<B: CacheBackend> {
    coordinator: Arc<CacheCoordinator<B>>,
}

impl<B: CacheBackend> CacheService<B> {
    pub fn new(backend: B, registry: Arc<IndexRegistry>) -> Self {
        CacheService {
            coordinator: Arc::new(CacheCoordinator::new(backend, registry)),
        }
    }

    /// Create a service that reports to a custom metrics handler.
    pub fn with_metrics(
        backend: B,
        registry: Arc<IndexRegistry>,
        metrics: Box<dyn CacheMetrics>,
    ) -> Self {
        CacheService {
            coordinator: Arc::new(CacheCoordinator::new(backend, registry).with_metrics(metrics)),
        }
    }

    /// See [`CacheCoordinator::read`].
    pub async fn read<T: CacheEntity>(&self, query: &AttributeQuery) -> Result<Option<T>> {
        self.coordinator.read::<T>(query).await
    }

    /// See [`CacheCoordinator::fetch`].
    pub async fn fetch<T, R>(&self, query: &AttributeQuery, repository: &R) -> Result<Option<T>>
    where
        T: CacheEntity,
        R: DataRepository<T>,
    {
        self.coordinator.fetch::<T, R>(query, repository).await
    }

    /// See [`CacheCoordinator::write`].
    pub async fn write<T: CacheEntity>(&self, entity: &T) -> Result<()> {
        self.coordinator.write(entity).await
    }

    /// See [`CacheCoordinator::expire`].
    pub async fn expire<T: CacheEntity>(&self, query: &AttributeQuery) -> Result<()> {
        self.coordinator.expire::<T>(query).await
    }

    /// See [`CacheCoordinator::expire_with`].
    pub async fn expire_with<T, R>(&self, query: &AttributeQuery, repository: &R) -> Result<()>
    where
        T: CacheEntity,
        R: DataRepository<T>,
    {
        self.coordinator.expire_with::<T, R>(query, repository).await
    }

    pub async fn after_create<T: CacheEntity>(&self, entity: &T) -> Result<()> {
        self.coordinator.after_create(entity).await
    }

    pub async fn after_update<T: CacheEntity>(
        &self,
        entity: &T,
        previous: &AttributeQuery,
    ) -> Result<()> {
        self.coordinator.after_update(entity, previous).await
    }

    pub async fn after_destroy<T: CacheEntity>(&self, entity: &T) -> Result<()> {
        self.coordinator.after_destroy(entity).await
    }

    /// Get the underlying coordinator (for advanced use).
    pub fn coordinator(&self) -> &CacheCoordinator<B> {
        &self.coordinator
    }
}
