//! Snapshot encoding for cache entries.
//!
//! Every entry is a postcard-encoded envelope:
//!
//! ```text
//! ┌─────────────────┬──────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│ FORMAT (varint)  │ POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴──────────────────┴──────────────────────────┘
//!   "SLCE"              u32                postcard::to_allocvec(T)
//! ```
//!
//! The envelope format version is independent of the per-type key version
//! in [`IndexSet`](crate::config::IndexSet). The key version orphans entries
//! when a type's shape changes; the format version guards the envelope.
//!
//! ```rust
//! use slcache::serialization::{serialize_for_cache, deserialize_from_cache};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u64,
//!     email: String,
//! }
//!
//! # fn main() -> slcache::Result<()> {
//! let user = User { id: 1, email: "a@x.com".to_string() };
//! let bytes = serialize_for_cache(&user)?;
//! let decoded: User = deserialize_from_cache(&bytes)?;
//! assert_eq!(user, decoded);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for snapshot entries.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"SLCE";

/// Current envelope format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Envelope wrapped around every cached snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotEnvelope<T> {
    pub magic: [u8; 4],
    pub format: u32,
    pub payload: T,
}

impl<T> SnapshotEnvelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            format: SNAPSHOT_FORMAT_VERSION,
            payload,
        }
    }
}

/// Serialize a value into an enveloped snapshot.
///
/// # Errors
///
/// Returns `Error::SerializationError` if postcard encoding fails.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = SnapshotEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("Snapshot serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize an enveloped snapshot, validating magic and format.
///
/// # Errors
///
/// - `Error::DeserializationError`: payload or envelope does not decode
/// - `Error::InvalidCacheEntry`: magic header mismatch
/// - `Error::VersionMismatch`: envelope format differs
pub fn deserialize_from_cache<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: SnapshotEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        error!("Snapshot deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != SNAPSHOT_MAGIC {
        warn!(
            "Invalid snapshot: expected magic {:?}, got {:?}",
            SNAPSHOT_MAGIC, envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            SNAPSHOT_MAGIC, envelope.magic
        )));
    }

    if envelope.format != SNAPSHOT_FORMAT_VERSION {
        warn!(
            "Snapshot format mismatch: expected {}, got {}",
            SNAPSHOT_FORMAT_VERSION, envelope.format
        );
        return Err(Error::VersionMismatch {
            expected: SNAPSHOT_FORMAT_VERSION,
            found: envelope.format,
        });
    }

    Ok(envelope.payload)
}
