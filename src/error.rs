//! Error types for the second-level cache.

use std::fmt;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the second-level cache.
///
/// Read misses and unresolvable queries are not errors from the caller's point
/// of view: `read` and `expire` turn them into `Ok(None)` / `Ok(())`. The
/// variants below surface only where a caller can act on them.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The attribute query does not cover any declared unique index.
    ///
    /// Only returned from explicit resolution (`unique_index`). Reads treat
    /// it as a miss and expires treat it as a no-op.
    NoMatchingIndex(String),

    /// Cache store transport or backend failure (Redis, Memcached, etc).
    ///
    /// Propagated to the caller of the failing operation. Sibling key
    /// operations of the same fan-out are still attempted.
    ///
    /// **Recovery:** Retry the operation or read from the primary store.
    StoreUnavailable(String),

    /// A unique index declaration is invalid for its entity type.
    ///
    /// Raised at registration time when:
    /// - an index names an attribute the type does not declare
    /// - an index is empty
    /// - an index repeats an attribute
    MisconfiguredIndex(String),

    /// Configuration error.
    ///
    /// Common causes:
    /// - No index set registered for the entity type
    /// - Invalid backend connection settings
    /// - Unparsable index declaration
    ConfigError(String),

    /// Serialization failed when converting an entity snapshot to bytes.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes to an entity.
    ///
    /// **Recovery:** The entry is evicted and treated as a miss.
    DeserializationError(String),

    /// Invalid cache entry: bad magic header or not a snapshot envelope.
    InvalidCacheEntry(String),

    /// Snapshot format version differs between code and cached data.
    VersionMismatch {
        /// Expected format version (from compiled code)
        expected: u32,
        /// Found format version (from cached entry)
        found: u32,
    },

    /// `CacheEntity::validate` rejected a decoded snapshot.
    ValidationError(String),

    /// Primary datastore failure reported by a `DataRepository`.
    RepositoryError(String),

    /// Feature not implemented or not enabled.
    NotImplemented(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Whether this error came from decoding a snapshot.
    ///
    /// Such entries are unusable and get evicted instead of failing a read.
    pub fn is_corrupt_entry(&self) -> bool {
        matches!(
            self,
            Error::DeserializationError(_)
                | Error::InvalidCacheEntry(_)
                | Error::VersionMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoMatchingIndex(msg) => write!(f, "No matching unique index: {}", msg),
            Error::StoreUnavailable(msg) => write!(f, "Cache store unavailable: {}", msg),
            Error::MisconfiguredIndex(msg) => write!(f, "Misconfigured unique index: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::StoreUnavailable(e.to_string())
        } else {
            Error::ConfigError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StoreUnavailable(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::StoreUnavailable(format!("Redis error: {}", e))
    }
}
