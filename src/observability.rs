//! Metrics hooks for cache operations.
//!
//! Implement [`CacheMetrics`] to forward per-key events to a monitoring
//! system, then attach it with
//! [`CacheCoordinator::with_metrics`](crate::coordinator::CacheCoordinator::with_metrics):
//!
//! ```ignore
//! use slcache::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("slc_hits").inc();
//!     }
//! }
//!
//! let coordinator = CacheCoordinator::new(backend, registry)
//!     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Unoverridden methods log through the `log` crate. The coordinator uses
//! [`NoOpMetrics`] until told otherwise.
//!
//! A fan-out records one event per key, so a `write` over three declared
//! indexes produces three `record_set` calls (or `record_error` for keys the
//! backend rejected).

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache set operation.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a cache delete operation.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Cache DELETE: {} took {:?}", key, duration);
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}
