//! Store trait for the shared key-value/list backend.

use async_trait::async_trait;
use std::time::Duration;

/// Shared key-value/list store: the single source of truth for the job
/// queue, metadata records, result blobs and the recency list.
///
/// Contract: `get` returns `Ok(None)` for a missing key, which covers both
/// "never written" and "expired by TTL" - callers cannot tell them apart.
/// Each method is one atomic store operation; no sequence of calls is
/// assumed to be atomic.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Set `key` to `value` with an expiry, overwriting any prior value.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), KvStoreError>;

    /// Value at `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError>;

    /// Append `value` at the tail of the list at `key`.
    async fn rpush(&self, key: &str, value: &str) -> Result<(), KvStoreError>;

    /// Insert `value` at the head of the list at `key`.
    async fn lpush(&self, key: &str, value: &str) -> Result<(), KvStoreError>;

    /// Trim the list at `key` to the inclusive index range `start..=stop`
    /// (negative indices count from the tail, as in Redis).
    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), KvStoreError>;

    /// Elements of the list at `key` in the inclusive index range, head first.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, KvStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum KvStoreError {
    #[error("store connection error: {0}")]
    Connection(String),
    #[error("store command error: {0}")]
    Command(String),
}
