//! Memcached cache backend.

use super::CacheBackend;
use crate::error::{Error, Result};
use async_memcached::AsciiProtocol;
use deadpool_memcached::{Manager, Pool};
use std::fmt::Display;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default connection pool size, overridable with `MEMCACHED_POOL_SIZE`.
const DEFAULT_POOL_SIZE: u32 = 16;

/// Memcached rejects keys longer than this.
pub const MAX_KEY_LEN: usize = 250;

/// Longest expiration memcached reads as relative; larger values are Unix times.
const MAX_RELATIVE_EXPIRATION: u64 = 30 * 24 * 3600;

/// Configuration for Memcached backend.
#[derive(Clone, Debug)]
pub struct MemcachedConfig {
    /// Server address, e.g. `localhost:11211`.
    pub server: String,
    pub pool_size: u32,
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        MemcachedConfig {
            server: "localhost:11211".to_string(),
            pool_size: std::env::var("MEMCACHED_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(DEFAULT_POOL_SIZE),
        }
    }
}

/// Memcached backend over a deadpool connection pool.
///
/// Cache keys carry attribute values verbatim, so a key that is too long or
/// contains whitespace is rejected with `Error::StoreUnavailable` before
/// reaching the server.
#[derive(Clone)]
pub struct MemcachedBackend {
    pool: Pool,
}

impl MemcachedBackend {
    /// Create a backend from configuration.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if the pool cannot be built.
    pub fn new(config: MemcachedConfig) -> Result<Self> {
        if config.server.is_empty() {
            return Err(Error::ConfigError(
                "No memcached server specified".to_string(),
            ));
        }

        let pool = Pool::builder(Manager::new(config.server.clone()))
            .max_size(config.pool_size as usize)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create connection pool: {}", e)))?;

        info!(
            "✓ Memcached backend initialized with server: {} (pool size: {})",
            config.server, config.pool_size
        );

        Ok(MemcachedBackend { pool })
    }
}

fn pool_error(e: impl Display) -> Error {
    Error::StoreUnavailable(format!("Failed to get Memcached connection: {}", e))
}

/// Expiration field for a TTL. `None` never expires.
///
/// Rounds up to at least one second, since `0` means no expiry. TTLs past
/// 30 days are sent as an absolute Unix time counted from `now`.
fn expiration(ttl: Option<Duration>, now: SystemTime) -> Option<i64> {
    let secs = ttl?.as_secs_f64().ceil().max(1.0) as u64;
    if secs <= MAX_RELATIVE_EXPIRATION {
        return Some(secs as i64);
    }

    let epoch = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Some(epoch.saturating_add(secs) as i64)
}

/// Reject keys the memcached text protocol cannot carry.
fn check_key(key: &str) -> Result<()> {
    if key.len() > MAX_KEY_LEN || key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::StoreUnavailable(format!(
            "key not storable in memcached: {}",
            key
        )));
    }
    Ok(())
}

impl CacheBackend for MemcachedBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        check_key(key)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        match conn.get(key).await {
            Ok(Some(value)) => {
                debug!("✓ Memcached GET {} -> HIT", key);
                Ok(value.data)
            }
            Ok(None) => {
                debug!("✓ Memcached GET {} -> MISS", key);
                Ok(None)
            }
            Err(e) => Err(Error::StoreUnavailable(format!(
                "Memcached GET failed for key {}: {}",
                key, e
            ))),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        check_key(key)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let exptime = expiration(ttl, SystemTime::now());

        conn.set(key, value.as_slice(), exptime, None)
            .await
            .map_err(|e| {
                Error::StoreUnavailable(format!("Memcached SET failed for key {}: {}", key, e))
            })?;

        debug!("✓ Memcached SET {} (TTL: {:?})", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        match conn.delete(key).await {
            Ok(()) => {
                debug!("✓ Memcached DELETE {}", key);
                Ok(())
            }
            // deleting an absent key is not a failure
            Err(e) if e.to_string().contains("not found") => Ok(()),
            Err(e) => Err(Error::StoreUnavailable(format!(
                "Memcached DELETE failed for key {}: {}",
                key, e
            ))),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        Ok(conn.get("__health_check__").await.is_ok())
    }
}
