//! Key-value store abstraction for cache entries and access counters.
//!
//! All durable state lives behind the [`KeyValueStore`] trait. Two backends
//! are provided:
//!
//! - [`MemoryStore`] - in-process map for tests and single-process use
//! - [`RedisStore`] - Redis-backed store (feature `redis`)
//!
//! Per-key operations are atomic within a backend; the trait defines no
//! cross-key transactions.

pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

use std::time::Duration;

use crate::Error;

pub use memory::MemoryStore;

#[cfg(feature = "redis")]
pub use redis::RedisStore;

/// Minimal key-value store contract.
///
/// Values are text. TTLs are durations from the last write; once elapsed,
/// the key reads back as absent.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key. Returns None when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store a value under a key, with an optional time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error>;

    /// Increment an integer counter, creating it at 0 first if absent.
    /// Returns the value after the increment.
    async fn increment(&self, key: &str) -> Result<i64, Error>;

    /// Set a time-to-live on an existing key. Returns false when the key
    /// does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, Error>;
}
