//! Cache coordinator - main entry point for cache operations.
//!
//! Reads resolve an attribute query to one declared unique index and look up
//! the single key it renders to. Writes and expires fan out over every key
//! an entity is reachable by, so all unique indexes stay in agreement.

use crate::backend::CacheBackend;
use crate::config::IndexSet;
use crate::entity::CacheEntity;
use crate::error::{Error, Result};
use crate::index::{covered_indexes, match_index, MatchedIndex, UniqueIndex};
use crate::key::{CacheKey, CacheKeyBuilder};
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::query::AttributeQuery;
use crate::registry::IndexRegistry;
use crate::repository::DataRepository;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
enum FanOut {
    Set,
    Delete,
}

/// Core cache coordinator.
///
/// Holds the cache store and the per-type index declarations. Every method
/// takes `&self`, so one coordinator can be shared across tasks.
///
/// # Example
///
/// ```ignore
/// use slcache::{CacheCoordinator, IndexRegistry, IndexSet, AttributeQuery};
/// use slcache::backend::InMemoryBackend;
/// use std::sync::Arc;
///
/// let registry = Arc::new(IndexRegistry::new());
/// registry.register::<User>(
///     IndexSet::builder().unique_index("email").build(),
/// )?;
///
/// let coordinator = CacheCoordinator::new(InMemoryBackend::new(), registry);
/// coordinator.write(&user).await?;
///
/// let cached: Option<User> = coordinator
///     .read(&AttributeQuery::new().with("email", "a@x.com"))
///     .await?;
/// ```
pub struct CacheCoordinator<B: CacheBackend> {
    backend: B,
    registry: Arc<IndexRegistry>,
    metrics: Box<dyn CacheMetrics>,
}

impl<B: CacheBackend> CacheCoordinator<B> {
    /// Create new coordinator with given backend and index declarations.
    pub fn new(backend: B, registry: Arc<IndexRegistry>) -> Self {
        CacheCoordinator {
            backend,
            registry,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &Arc<IndexRegistry> {
        &self.registry
    }

    /// Look up a cached entity by unique attributes.
    ///
    /// Only exact unique-index lookups are answered: the query must cover a
    /// declared index and name no attribute outside it. Anything else, a
    /// missing entry, or an unreadable entry is `Ok(None)`. Never populates
    /// the cache.
    ///
    /// # Errors
    ///
    /// - `Error::ConfigError`: `T` has no registered index set
    /// - `Error::StoreUnavailable`: the backend failed
    /// - `Error::ValidationError`: the cached entity failed `validate`
    pub async fn read<T: CacheEntity>(&self, query: &AttributeQuery) -> Result<Option<T>> {
        let set = self.registry.get::<T>()?;

        let matched = match match_index(set.unique_indexes(), query) {
            Ok(matched) => matched,
            Err(Error::NoMatchingIndex(reason)) => {
                debug!("{}: read skipped, {}", T::storage_name(), reason);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !matched.covers_exactly(query) {
            debug!(
                "{}: read skipped, query has attributes outside {}",
                T::storage_name(),
                matched.index()
            );
            return Ok(None);
        }

        let key = CacheKeyBuilder::build::<T>(&matched, set.version());
        self.load::<T>(&key).await
    }

    /// Look up through the cache, falling back to the repository on a miss.
    ///
    /// The repository result is returned as is; caching it is left to the
    /// caller (see [`write`](Self::write)).
    ///
    /// # Errors
    ///
    /// Errors from [`read`](Self::read) and `Error::RepositoryError`.
    pub async fn fetch<T, R>(&self, query: &AttributeQuery, repository: &R) -> Result<Option<T>>
    where
        T: CacheEntity,
        R: DataRepository<T>,
    {
        if let Some(entity) = self.read::<T>(query).await? {
            return Ok(Some(entity));
        }

        debug!("{}: cache miss, falling back to repository", T::storage_name());
        repository.find_by(query).await
    }

    /// Store the entity under every declared index it has values for.
    ///
    /// All sets are attempted concurrently. If any failed, the first failure
    /// is returned once the fan-out is complete; keys that were written stay
    /// written.
    ///
    /// # Errors
    ///
    /// - `Error::ConfigError`: `T` has no registered index set
    /// - `Error::SerializationError`: the snapshot could not be encoded
    /// - `Error::StoreUnavailable`: at least one set failed
    pub async fn write<T: CacheEntity>(&self, entity: &T) -> Result<()> {
        let set = self.registry.get::<T>()?;
        let keys = CacheKeyBuilder::keys_for_entity(&set, entity);
        if keys.is_empty() {
            debug!("{}: no index keys to write", T::storage_name());
            return Ok(());
        }

        let snapshot = entity.serialize_for_cache()?;
        let ttl = set.ttl();

        let outcomes = join_all(keys.iter().map(|key| {
            let snapshot = snapshot.clone();
            async move {
                let timer = Instant::now();
                let result = self.backend.set(key.as_str(), snapshot, ttl).await;
                (key, result, timer.elapsed())
            }
        }))
        .await;

        self.settle(FanOut::Set, outcomes)
    }

    /// Delete every key the entity addressed by `query` is cached under.
    ///
    /// Keys come from each declared index the query fully covers, plus every
    /// index key of the snapshot found through the matched index. A query
    /// that covers no index is a no-op.
    ///
    /// # Errors
    ///
    /// - `Error::ConfigError`: `T` has no registered index set
    /// - `Error::StoreUnavailable`: the lookup or at least one delete failed
    pub async fn expire<T: CacheEntity>(&self, query: &AttributeQuery) -> Result<()> {
        let set = self.registry.get::<T>()?;
        let Some(mut keys) = covered_keys::<T>(&set, query) else {
            return Ok(());
        };

        let lookup = self.cached_snapshot::<T>(&set, query).await;
        if let Ok(Some(cached)) = &lookup {
            extend_unique(&mut keys, CacheKeyBuilder::keys_for_entity(&set, cached));
        }

        let deleted = self.delete_keys(&keys).await;
        lookup.and(deleted)
    }

    /// Like [`expire`](Self::expire), resolving the entity through the
    /// repository when the cache holds no snapshot for it.
    ///
    /// # Errors
    ///
    /// Errors from [`expire`](Self::expire) and `Error::RepositoryError`.
    pub async fn expire_with<T, R>(&self, query: &AttributeQuery, repository: &R) -> Result<()>
    where
        T: CacheEntity,
        R: DataRepository<T>,
    {
        let set = self.registry.get::<T>()?;
        let Some(mut keys) = covered_keys::<T>(&set, query) else {
            return Ok(());
        };

        let lookup = match self.cached_snapshot::<T>(&set, query).await {
            Ok(None) => repository.find_by(query).await,
            other => other,
        };
        if let Ok(Some(entity)) = &lookup {
            extend_unique(&mut keys, CacheKeyBuilder::keys_for_entity(&set, entity));
        }

        let deleted = self.delete_keys(&keys).await;
        lookup.and(deleted)
    }

    /// Delete every key derived from the entity's current values.
    ///
    /// # Errors
    ///
    /// - `Error::ConfigError`: `T` has no registered index set
    /// - `Error::StoreUnavailable`: at least one delete failed
    pub async fn expire_entity<T: CacheEntity>(&self, entity: &T) -> Result<()> {
        let set = self.registry.get::<T>()?;
        let keys = CacheKeyBuilder::keys_for_entity(&set, entity);
        self.delete_keys(&keys).await
    }

    /// Resolve `query` to the first declared index it covers.
    ///
    /// # Errors
    ///
    /// - `Error::ConfigError`: `T` has no registered index set
    /// - `Error::NoMatchingIndex`: the query covers no declared index
    pub fn unique_index<T: CacheEntity>(&self, query: &AttributeQuery) -> Result<MatchedIndex> {
        let set = self.registry.get::<T>()?;
        match_index(set.unique_indexes(), query)
    }

    /// Key the entity would be stored under for the given attributes.
    ///
    /// The attributes need not form a declared index and their order does
    /// not matter. `None` when the entity has no value for one of them.
    ///
    /// # Errors
    ///
    /// `Error::ConfigError` if `T` has no registered index set.
    pub fn cache_key_for<T: CacheEntity>(
        &self,
        entity: &T,
        attributes: &[&str],
    ) -> Result<Option<CacheKey>> {
        let set = self.registry.get::<T>()?;
        let index = UniqueIndex::composite(attributes.iter().copied());
        Ok(MatchedIndex::from_entity(&index, entity)
            .map(|matched| CacheKeyBuilder::build::<T>(&matched, set.version())))
    }

    /// Delete `keys` concurrently, attempting all of them.
    pub(crate) async fn delete_keys(&self, keys: &[CacheKey]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let outcomes = join_all(keys.iter().map(|key| async move {
            let timer = Instant::now();
            let result = self.backend.delete(key.as_str()).await;
            (key, result, timer.elapsed())
        }))
        .await;

        self.settle(FanOut::Delete, outcomes)
    }

    /// Snapshot cached under the index `query` resolves to, if any.
    async fn cached_snapshot<T: CacheEntity>(
        &self,
        set: &IndexSet,
        query: &AttributeQuery,
    ) -> Result<Option<T>> {
        let Ok(matched) = match_index(set.unique_indexes(), query) else {
            return Ok(None);
        };
        let key = CacheKeyBuilder::build::<T>(&matched, set.version());

        self.load::<T>(&key).await.map_err(|e| {
            warn!("⚠ Snapshot lookup failed for {}: {}", key, e);
            e
        })
    }

    /// Fetch and decode one entry. Unreadable entries are evicted.
    async fn load<T: CacheEntity>(&self, key: &CacheKey) -> Result<Option<T>> {
        let timer = Instant::now();

        let bytes = match self.backend.get(key.as_str()).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.metrics.record_miss(key.as_str(), timer.elapsed());
                return Ok(None);
            }
            Err(e) => {
                self.metrics.record_error(key.as_str(), &e.to_string());
                return Err(e);
            }
        };

        match T::deserialize_from_cache(&bytes) {
            Ok(entity) => {
                if let Err(e) = entity.validate() {
                    self.metrics.record_error(key.as_str(), &e.to_string());
                    return Err(e);
                }
                self.metrics.record_hit(key.as_str(), timer.elapsed());
                Ok(Some(entity))
            }
            Err(e) if e.is_corrupt_entry() => {
                warn!("⚠ Evicting unreadable entry {}: {}", key, e);
                if let Err(delete_err) = self.backend.delete(key.as_str()).await {
                    warn!("⚠ Eviction of {} failed: {}", key, delete_err);
                }
                self.metrics.record_miss(key.as_str(), timer.elapsed());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Report every outcome of a fan-out and return the first failure.
    fn settle(&self, op: FanOut, outcomes: Vec<(&CacheKey, Result<()>, Duration)>) -> Result<()> {
        let mut first_error = None;
        let total = outcomes.len();
        let mut failed = 0;

        for (key, result, elapsed) in outcomes {
            match result {
                Ok(()) => match op {
                    FanOut::Set => self.metrics.record_set(key.as_str(), elapsed),
                    FanOut::Delete => self.metrics.record_delete(key.as_str(), elapsed),
                },
                Err(e) => {
                    failed += 1;
                    warn!("⚠ {:?} failed for {}: {}", op, key, e);
                    self.metrics.record_error(key.as_str(), &e.to_string());
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => {
                warn!("⚠ {:?} fan-out: {}/{} keys failed", op, failed, total);
                Err(e)
            }
            None => {
                debug!("✓ {:?} fan-out over {} keys", op, total);
                Ok(())
            }
        }
    }
}

/// Keys of every declared index `query` fully covers, or `None` if it
/// covers none.
fn covered_keys<T: CacheEntity>(set: &IndexSet, query: &AttributeQuery) -> Option<Vec<CacheKey>> {
    let covered = covered_indexes(set.unique_indexes(), query);
    if covered.is_empty() {
        debug!(
            "{}: expire is a no-op, [{}] covers no index",
            T::storage_name(),
            query.names().collect::<Vec<_>>().join(", ")
        );
        return None;
    }

    let mut keys = Vec::with_capacity(set.unique_indexes().len());
    extend_unique(
        &mut keys,
        covered
            .iter()
            .map(|matched| CacheKeyBuilder::build::<T>(matched, set.version())),
    );
    Some(keys)
}

fn extend_unique(keys: &mut Vec<CacheKey>, more: impl IntoIterator<Item = CacheKey>) {
    for key in more {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::repository::InMemoryRepository;
    use crate::value::AttributeValue;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        id: i64,
        email: String,
        name: String,
        status: String,
    }

    impl CacheEntity for User {
        fn storage_name() -> &'static str {
            "users"
        }

        fn attribute_names() -> &'static [&'static str] {
            &["id", "email", "name", "status"]
        }

        fn attribute(&self, name: &str) -> Option<AttributeValue> {
            match name {
                "id" => Some(self.id.into()),
                "email" => Some(self.email.as_str().into()),
                "name" => Some(self.name.as_str().into()),
                "status" => Some(AttributeValue::enumeration(self.status.as_str())),
                _ => None,
            }
        }
    }

    fn user() -> User {
        User {
            id: 1,
            email: "a@x.com".to_string(),
            name: "foobar".to_string(),
            status: "active".to_string(),
        }
    }

    fn registry() -> Arc<IndexRegistry> {
        let registry = Arc::new(IndexRegistry::new());
        registry
            .register::<User>(
                IndexSet::builder()
                    .version(3)
                    .unique_index("id")
                    .unique_index("email")
                    .composite_index(["name", "status"])
                    .build(),
            )
            .expect("Failed to register");
        registry
    }

    fn by_email(email: &str) -> AttributeQuery {
        AttributeQuery::new().with("email", email)
    }

    fn by_name_status() -> AttributeQuery {
        AttributeQuery::new()
            .with("name", "foobar")
            .with("status", AttributeValue::enumeration("active"))
    }

    /// Fails every operation on keys containing `poison`.
    #[derive(Clone)]
    struct FlakyBackend {
        inner: InMemoryBackend,
        poison: &'static str,
    }

    impl FlakyBackend {
        fn check(&self, key: &str) -> Result<()> {
            if key.contains(self.poison) {
                return Err(Error::StoreUnavailable(format!("connection reset: {}", key)));
            }
            Ok(())
        }
    }

    impl CacheBackend for FlakyBackend {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.check(key)?;
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
            self.check(key)?;
            self.inner.set(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.check(key)?;
            self.inner.delete(key).await
        }
    }

    #[derive(Clone, Default)]
    struct CountingMetrics {
        hits: Arc<AtomicUsize>,
        misses: Arc<AtomicUsize>,
        sets: Arc<AtomicUsize>,
        errors: Arc<AtomicUsize>,
    }

    impl CacheMetrics for CountingMetrics {
        fn record_hit(&self, _key: &str, _duration: Duration) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }

        fn record_miss(&self, _key: &str, _duration: Duration) {
            self.misses.fetch_add(1, Ordering::SeqCst);
        }

        fn record_set(&self, _key: &str, _duration: Duration) {
            self.sets.fetch_add(1, Ordering::SeqCst);
        }

        fn record_error(&self, _key: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_write_then_read_by_every_index() {
        let backend = InMemoryBackend::new();
        let coordinator = CacheCoordinator::new(backend.clone(), registry());

        coordinator.write(&user()).await.expect("Failed to write");
        assert_eq!(backend.len(), 3);

        for query in [
            AttributeQuery::new().with("id", 1i64),
            by_email("a@x.com"),
            by_name_status(),
        ] {
            let cached = coordinator.read::<User>(&query).await.expect("Failed to read");
            assert_eq!(cached, Some(user()));
        }
    }

    #[tokio::test]
    async fn test_read_is_strict() {
        let coordinator = CacheCoordinator::new(InMemoryBackend::new(), registry());
        coordinator.write(&user()).await.expect("Failed to write");

        let query = by_email("a@x.com").with("name", "foobar");
        assert!(coordinator
            .read::<User>(&query)
            .await
            .expect("Failed to read")
            .is_none());
    }

    #[tokio::test]
    async fn test_read_unmatched_query_is_miss() {
        let coordinator = CacheCoordinator::new(InMemoryBackend::new(), registry());
        coordinator.write(&user()).await.expect("Failed to write");

        let query = AttributeQuery::new().with("name", "foobar");
        assert!(coordinator
            .read::<User>(&query)
            .await
            .expect("Failed to read")
            .is_none());
    }

    #[tokio::test]
    async fn test_read_unregistered_type() {
        let coordinator =
            CacheCoordinator::new(InMemoryBackend::new(), Arc::new(IndexRegistry::new()));
        let result = coordinator.read::<User>(&by_email("a@x.com")).await;
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_expire_by_one_index_clears_all() {
        let backend = InMemoryBackend::new();
        let coordinator = CacheCoordinator::new(backend.clone(), registry());
        coordinator.write(&user()).await.expect("Failed to write");

        coordinator
            .expire::<User>(&by_email("a@x.com"))
            .await
            .expect("Failed to expire");

        assert!(backend.is_empty());
        assert!(coordinator
            .read::<User>(&by_name_status())
            .await
            .expect("Failed to read")
            .is_none());
    }

    #[tokio::test]
    async fn test_expire_unmatched_query_is_noop() {
        let backend = InMemoryBackend::new();
        let coordinator = CacheCoordinator::new(backend.clone(), registry());
        coordinator.write(&user()).await.expect("Failed to write");

        coordinator
            .expire::<User>(&AttributeQuery::new().with("status", "active"))
            .await
            .expect("Failed to expire");
        assert_eq!(backend.len(), 3);
    }

    #[tokio::test]
    async fn test_expire_with_falls_back_to_repository() {
        let backend = InMemoryBackend::new();
        let coordinator = CacheCoordinator::new(backend.clone(), registry());
        coordinator.write(&user()).await.expect("Failed to write");

        // only the email entry is gone, the others are still cached
        let email_key = coordinator
            .cache_key_for(&user(), &["email"])
            .expect("Failed to render")
            .expect("Missing key");
        backend.delete(email_key.as_str()).await.expect("Failed to delete");

        let mut repo = InMemoryRepository::new();
        repo.insert(user());

        coordinator
            .expire_with::<User, _>(&by_email("a@x.com"), &repo)
            .await
            .expect("Failed to expire");
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_expire_entity() {
        let backend = InMemoryBackend::new();
        let coordinator = CacheCoordinator::new(backend.clone(), registry());
        coordinator.write(&user()).await.expect("Failed to write");

        coordinator.expire_entity(&user()).await.expect("Failed to expire");
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_does_not_populate() {
        let backend = InMemoryBackend::new();
        let coordinator = CacheCoordinator::new(backend.clone(), registry());
        let mut repo = InMemoryRepository::new();
        repo.insert(user());

        let fetched = coordinator
            .fetch::<User, _>(&by_email("a@x.com"), &repo)
            .await
            .expect("Failed to fetch");
        assert_eq!(fetched, Some(user()));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_entry_evicted() {
        let backend = InMemoryBackend::new();
        let coordinator = CacheCoordinator::new(backend.clone(), registry());
        let key = coordinator
            .cache_key_for(&user(), &["email"])
            .expect("Failed to render")
            .expect("Missing key");

        backend
            .set(key.as_str(), b"not a snapshot".to_vec(), None)
            .await
            .expect("Failed to set");

        let cached = coordinator
            .read::<User>(&by_email("a@x.com"))
            .await
            .expect("Failed to read");
        assert!(cached.is_none());
        assert!(!backend.exists(key.as_str()).await.expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_write_fan_out_attempts_every_key() {
        let inner = InMemoryBackend::new();
        let metrics = CountingMetrics::default();
        let coordinator = CacheCoordinator::new(
            FlakyBackend {
                inner: inner.clone(),
                poison: "email=",
            },
            registry(),
        )
        .with_metrics(Box::new(metrics.clone()));

        let result = coordinator.write(&user()).await;
        assert!(matches!(result, Err(Error::StoreUnavailable(_))));

        // the other two keys were still written
        assert_eq!(inner.len(), 2);
        assert_eq!(metrics.sets.load(Ordering::SeqCst), 2);
        assert_eq!(metrics.errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expire_fan_out_attempts_every_key() {
        let inner = InMemoryBackend::new();
        CacheCoordinator::new(inner.clone(), registry())
            .write(&user())
            .await
            .expect("Failed to write");

        let flaky = CacheCoordinator::new(
            FlakyBackend {
                inner: inner.clone(),
                poison: "name=",
            },
            registry(),
        );
        let result = flaky.expire::<User>(&AttributeQuery::new().with("id", 1i64)).await;
        assert!(result.is_err());
        assert_eq!(inner.len(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_propagates_on_read() {
        let coordinator = CacheCoordinator::new(
            FlakyBackend {
                inner: InMemoryBackend::new(),
                poison: "slc/",
            },
            registry(),
        );
        let result = coordinator.read::<User>(&by_email("a@x.com")).await;
        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_metrics_hits_and_misses() {
        let metrics = CountingMetrics::default();
        let coordinator = CacheCoordinator::new(InMemoryBackend::new(), registry())
            .with_metrics(Box::new(metrics.clone()));

        coordinator
            .read::<User>(&by_email("a@x.com"))
            .await
            .expect("Failed to read");
        coordinator.write(&user()).await.expect("Failed to write");
        coordinator
            .read::<User>(&by_email("a@x.com"))
            .await
            .expect("Failed to read");

        assert_eq!(metrics.misses.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.hits.load(Ordering::SeqCst), 1);
        assert_eq!(metrics.sets.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unique_index() {
        let coordinator = CacheCoordinator::new(InMemoryBackend::new(), registry());

        let query = AttributeQuery::new().with("id", 1i64).with("email", "a@x.com");
        let matched = coordinator
            .unique_index::<User>(&query)
            .expect("Failed to match");
        assert_eq!(matched.index(), &UniqueIndex::single("id"));

        let unmatched =
            coordinator.unique_index::<User>(&AttributeQuery::new().with("name", "foobar"));
        assert!(matches!(unmatched, Err(Error::NoMatchingIndex(_))));
    }

    #[test]
    fn test_cache_key_for_ignores_attribute_order() {
        let coordinator = CacheCoordinator::new(InMemoryBackend::new(), registry());

        let a = coordinator
            .cache_key_for(&user(), &["email", "name"])
            .expect("Failed to render");
        let b = coordinator
            .cache_key_for(&user(), &["name", "email"])
            .expect("Failed to render");
        assert_eq!(a, b);

        let key = a.expect("Missing key");
        assert!(key
            .as_str()
            .starts_with("slc/users/email=a@x.com&name=foobar/3/"));
    }
}
