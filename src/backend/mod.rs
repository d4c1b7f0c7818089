//! Cache store backends.
//!
//! The coordinator addresses the store by opaque string keys and treats it
//! as a plain key-value service: atomic per-key `get`/`set`/`delete`, no
//! multi-key transactions.

use crate::error::Result;
use std::time::Duration;

pub mod inmemory;
#[cfg(feature = "memcached")]
pub mod memcached;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "memcached")]
pub use memcached::{MemcachedBackend, MemcachedConfig};
#[cfg(feature = "redis")]
pub use redis::{RedisBackend, RedisConfig};

/// Trait for cache store implementations.
///
/// All methods take `&self`; implementations use interior mutability or an
/// external service so one backend can serve many concurrent tasks.
///
/// Failures of the store itself are reported as `Error::StoreUnavailable`.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve value from cache by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found in cache
    /// - `Ok(None)` - Cache miss (key not found or expired)
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value in cache with optional TTL.
    ///
    /// `ttl = None` leaves expiry to the store's default.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Remove value from cache. Deleting an absent key is not an error.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if key exists in cache.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Bulk get. Default implementation calls `get()` per key.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn mget(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(self.get(key).await?);
        }
        Ok(results)
    }

    /// Bulk delete. Default implementation calls `delete()` per key.
    ///
    /// # Errors
    /// Returns `Err` if the store is unreachable
    async fn mdelete(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.delete(key).await?;
        }
        Ok(())
    }

    /// Health check - verify the store is reachable.
    ///
    /// # Errors
    /// Returns `Err` if the store is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Optional: Clear every entry (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if not supported by this backend
    async fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::NotImplemented(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}
