//! # slcache
//!
//! A second-level, read-through entity cache keyed by unique indexes.
//!
//! Each entity type declares an ordered list of unique indexes (single
//! attributes or attribute groups). An entity is cached once per index, so it
//! can be read back by any unique attribute combination without touching the
//! primary datastore. Writes and expires fan out over every index key, which
//! keeps all cached copies of one entity in agreement.
//!
//! ## Features
//!
//! - **Index-addressed:** Lookups by `id`, `email`, `[name, status]` or any
//!   declared unique combination
//! - **Deterministic keys:** `slc/<storage>/<name=value&...>/<version>/<fingerprint>`;
//!   bumping the version invalidates a type without deleting anything
//! - **Backend Agnostic:** In-memory, Redis, Memcached, or custom backends
//! - **Best effort:** Corrupt entries are evicted and read as misses
//!
//! ## Quick Start
//!
//! ```ignore
//! use slcache::{
//!     AttributeQuery, AttributeValue, CacheEntity, CacheService, IndexRegistry, IndexSet,
//!     backend::InMemoryBackend,
//! };
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! // 1. Define your entity
//! #[derive(Clone, Serialize, Deserialize)]
//! struct User {
//!     id: i64,
//!     email: String,
//! }
//!
//! // 2. Implement CacheEntity
//! impl CacheEntity for User {
//!     fn storage_name() -> &'static str { "users" }
//!     fn attribute_names() -> &'static [&'static str] { &["id", "email"] }
//!     fn attribute(&self, name: &str) -> Option<AttributeValue> {
//!         match name {
//!             "id" => Some(self.id.into()),
//!             "email" => Some(self.email.as_str().into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! // 3. Declare unique indexes (the primary key is always included)
//! let registry = Arc::new(IndexRegistry::new());
//! registry.register::<User>(IndexSet::builder().version(1).unique_index("email").build())?;
//!
//! // 4. Create cache - CacheService is Clone for thread sharing
//! let cache = CacheService::new(InMemoryBackend::new(), registry);
//!
//! // 5. Hook it into the datastore write path, read by any unique index
//! cache.after_create(&user).await?;
//! let cached: Option<User> = cache.read(&AttributeQuery::new().with("email", "a@x.com")).await?;
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod hooks;
pub mod index;
pub mod key;
pub mod observability;
pub mod query;
pub mod registry;
pub mod repository;
pub mod serialization;
pub mod service;
pub mod value;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use config::IndexSet;
pub use coordinator::CacheCoordinator;
pub use entity::CacheEntity;
pub use error::{Error, Result};
pub use index::{MatchedIndex, UniqueIndex};
pub use key::{CacheKey, CacheKeyBuilder};
pub use query::AttributeQuery;
pub use registry::IndexRegistry;
pub use repository::DataRepository;
pub use service::CacheService;
pub use value::AttributeValue;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
