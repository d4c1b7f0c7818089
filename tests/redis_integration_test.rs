//! Redis Backend Integration Tests
//!
//! These tests require a running Redis instance.
//!
//! ```bash
//! docker run -d -p 6379:6379 redis:7
//! cargo test --features redis --test redis_integration_test
//! ```
//!
//! ## Environment Variables
//!
//! - `TEST_REDIS_HOST`: Redis host (default: "localhost")
//! - `TEST_REDIS_PORT`: Redis port (default: 6379)
//!
//! Tests skip themselves when Redis is unreachable.

#![cfg(feature = "redis")]

use serde::{Deserialize, Serialize};
use slcache::backend::{CacheBackend, RedisBackend, RedisConfig};
use slcache::config::IndexSet;
use slcache::{AttributeQuery, AttributeValue, CacheCoordinator, CacheEntity, IndexRegistry};
use std::env;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Namespace {
    id: i64,
    path: String,
    owner_id: i64,
}

impl CacheEntity for Namespace {
    fn storage_name() -> &'static str {
        "namespaces"
    }

    fn attribute_names() -> &'static [&'static str] {
        &["id", "path", "owner_id"]
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            "id" => Some(self.id.into()),
            "path" => Some(self.path.as_str().into()),
            "owner_id" => Some(self.owner_id.into()),
            _ => None,
        }
    }
}

/// Helper: Redis config from environment or defaults
fn test_config() -> RedisConfig {
    RedisConfig {
        host: env::var("TEST_REDIS_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: env::var("TEST_REDIS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(6379),
        pool_size: 4,
        ..RedisConfig::default()
    }
}

/// Helper: Backend if Redis answers PING
async fn available_backend() -> Option<RedisBackend> {
    let backend = RedisBackend::new(test_config()).ok()?;
    match backend.health_check().await {
        Ok(true) => Some(backend),
        _ => {
            println!("⚠️  Redis not available, skipping test");
            None
        }
    }
}

/// Helper: Id unlikely to collide with parallel runs
fn unique_id() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_nanos() % i64::MAX as u128) as i64)
        .unwrap_or(1)
}

fn coordinator(backend: RedisBackend, ttl: Duration) -> CacheCoordinator<RedisBackend> {
    let registry = Arc::new(IndexRegistry::new());
    registry
        .register::<Namespace>(
            IndexSet::builder()
                .version(2)
                .expires_in(ttl)
                .unique_index("path")
                .composite_index(["owner_id", "path"])
                .build(),
        )
        .expect("Registering should succeed");
    CacheCoordinator::new(backend, registry)
}

#[tokio::test]
async fn test_redis_basic_set_get_delete() {
    let Some(backend) = available_backend().await else {
        return;
    };

    let key = format!("slc/test/id={}/1/0000000", unique_id());
    backend
        .set(&key, b"snapshot".to_vec(), None)
        .await
        .expect("SET should succeed");
    assert_eq!(
        backend.get(&key).await.expect("GET should succeed"),
        Some(b"snapshot".to_vec())
    );

    backend.delete(&key).await.expect("DELETE should succeed");
    assert!(!backend.exists(&key).await.expect("EXISTS should succeed"));
}

#[tokio::test]
async fn test_redis_write_read_expire() {
    let Some(backend) = available_backend().await else {
        return;
    };
    let coordinator = coordinator(backend, Duration::from_secs(60));

    let id = unique_id();
    let namespace = Namespace {
        id,
        path: format!("group-{}", id),
        owner_id: 7,
    };

    coordinator.write(&namespace).await.expect("Write should succeed");

    let by_path = AttributeQuery::new().with("path", namespace.path.as_str());
    let by_owner_path = AttributeQuery::new()
        .with("owner_id", 7i64)
        .with("path", namespace.path.as_str());

    for query in [&by_path, &by_owner_path] {
        let cached = coordinator
            .read::<Namespace>(query)
            .await
            .expect("Read should succeed");
        assert_eq!(cached.as_ref(), Some(&namespace));
    }

    coordinator
        .expire::<Namespace>(&AttributeQuery::new().with("id", id))
        .await
        .expect("Expire should succeed");

    for query in [&by_path, &by_owner_path] {
        let cached = coordinator
            .read::<Namespace>(query)
            .await
            .expect("Read should succeed");
        assert!(cached.is_none());
    }
}

#[tokio::test]
async fn test_redis_ttl_expiration() {
    let Some(backend) = available_backend().await else {
        return;
    };
    let coordinator = coordinator(backend, Duration::from_secs(1));

    let id = unique_id();
    let namespace = Namespace {
        id,
        path: format!("ttl-{}", id),
        owner_id: 1,
    };
    coordinator.write(&namespace).await.expect("Write should succeed");

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let cached = coordinator
        .read::<Namespace>(&AttributeQuery::new().with("id", id))
        .await
        .expect("Read should succeed");
    assert!(cached.is_none(), "Entry should expire after 1s");
}
