use async_trait::async_trait;
use std::time::Duration;

use crate::error::CacheError;

/// A store is the key-value contract every cache component is built on.
///
/// Each method maps to one primitive of the backing store and must be atomic
/// with respect to concurrent callers. Multi-step sequences built on top of
/// these primitives are not atomic as a whole.
///
/// The store implementation is responsible for evicting expired data on its own.
#[async_trait]
pub trait Store: Send + Sync {
    /// A name for metrics/tracing.
    ///
    /// # Example
    /// - "memory"
    /// - "redis"
    /// - "metrics"
    fn name(&self) -> &'static str;

    /// Unconditionally overwrite `key` with `value`, clearing any expiry.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;

    /// Overwrite `key` with `value` and expire it after `ttl`.
    async fn set_with_expiry(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Return the raw value.
    ///
    /// The response must be `None` for missing or expired keys. An empty value
    /// is `Some(vec![])`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Atomically increment the integer at `key`, starting from 0.
    ///
    /// Returns the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64, CacheError>;

    /// Append `item` to the list at `key`, creating it if needed.
    ///
    /// Returns the list length after the push.
    async fn rpush(&self, key: &str, item: Vec<u8>) -> Result<usize, CacheError>;

    /// Read the inclusive range `start..=stop` of the list at `key`.
    ///
    /// Negative indexes count from the end, so `(0, -1)` reads the whole list
    /// in insertion order. A missing key reads as an empty list.
    async fn lrange(&self, key: &str, start: isize, stop: isize)
    -> Result<Vec<Vec<u8>>, CacheError>;

    /// Destroy every key in the store's namespace.
    async fn flush_all(&self) -> Result<(), CacheError>;
}
