//! Type-to-IndexSet registry.
//!
//! The registry is owned by the application root and shared with the
//! coordinator through an `Arc`. Registering a type again replaces its set
//! wholesale; later key derivations for that type use the new set.

use crate::config::IndexSet;
use crate::entity::CacheEntity;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

/// Registry of per-type cache configuration.
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(IndexRegistry::new());
/// registry.register::<User>(
///     IndexSet::builder()
///         .version(3)
///         .expires_in(Duration::from_secs(3 * 24 * 3600))
///         .unique_index("email")
///         .composite_index(["name", "status"])
///         .build(),
/// )?;
///
/// let coordinator = CacheCoordinator::new(backend, registry.clone());
/// ```
#[derive(Default)]
pub struct IndexRegistry {
    sets: DashMap<TypeId, Arc<IndexSet>>,
}

impl IndexRegistry {
    pub fn new() -> Self {
        IndexRegistry {
            sets: DashMap::new(),
        }
    }

    /// Declare (or re-declare) the index set for `T`.
    ///
    /// The set is validated against `T` and its primary key index is added
    /// when missing. Returns the set it replaced, if any.
    ///
    /// # Errors
    ///
    /// `Error::MisconfiguredIndex` if the declaration does not fit `T`; the
    /// previous set stays in place.
    pub fn register<T: CacheEntity>(&self, set: IndexSet) -> Result<Option<Arc<IndexSet>>> {
        let resolved = set.resolve_for::<T>()?;

        info!(
            "✓ Registered {} (version {}, {} unique indexes)",
            T::storage_name(),
            resolved.version(),
            resolved.unique_indexes().len()
        );

        Ok(self.sets.insert(TypeId::of::<T>(), Arc::new(resolved)))
    }

    /// Restore a previously returned set without re-validating it.
    pub fn restore<T: CacheEntity>(&self, set: Arc<IndexSet>) {
        self.sets.insert(TypeId::of::<T>(), set);
    }

    /// Current index set for `T`.
    ///
    /// # Errors
    ///
    /// `Error::ConfigError` if `T` was never registered.
    pub fn get<T: CacheEntity>(&self) -> Result<Arc<IndexSet>> {
        self.sets
            .get(&TypeId::of::<T>())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "no index set registered for {}",
                    T::storage_name()
                ))
            })
    }

    pub fn contains<T: CacheEntity>(&self) -> bool {
        self.sets.contains_key(&TypeId::of::<T>())
    }

    /// Remove the configuration for `T`.
    pub fn unregister<T: CacheEntity>(&self) -> Option<Arc<IndexSet>> {
        self.sets.remove(&TypeId::of::<T>()).map(|(_, set)| set)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
