//! Job store adapter: maps domain operations onto KvStore primitives.

use crate::keys;
use sim_types::{JobMeta, KvStore, KvStoreError, QueuedPayload};
use std::sync::Arc;
use std::time::Duration;

/// How long metadata and results persist before the store may drop them.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How many recent job ids the recency list retains.
pub const RECENT_MAX_RETAIN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum JobStoreError {
    #[error("backend: {0}")]
    Backend(#[from] KvStoreError),
    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Thin adapter over the shared store. Each method is one or two store
/// operations; nothing here is transactional across methods.
pub struct JobStore {
    kv: Arc<dyn KvStore>,
    ttl: Duration,
    recent_cap: usize,
}

impl JobStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self::with_limits(kv, DEFAULT_TTL, RECENT_MAX_RETAIN)
    }

    pub fn with_limits(kv: Arc<dyn KvStore>, ttl: Duration, recent_cap: usize) -> Self {
        Self {
            kv,
            ttl,
            recent_cap,
        }
    }

    /// Append the payload to the tail of the worker queue.
    pub async fn enqueue(&self, payload: &QueuedPayload) -> Result<(), JobStoreError> {
        let body = serde_json::to_string(payload)?;
        self.kv.rpush(keys::QUEUE_KEY, &body).await?;
        Ok(())
    }

    /// Upsert the metadata record with the configured TTL.
    pub async fn put_meta(&self, meta: &JobMeta) -> Result<(), JobStoreError> {
        let body = serde_json::to_string(meta)?;
        self.kv
            .set_with_ttl(&keys::meta_key(&meta.job_id), &body, self.ttl)
            .await?;
        Ok(())
    }

    /// Metadata record, or `None` when absent or expired.
    pub async fn get_meta(&self, job_id: &str) -> Result<Option<JobMeta>, JobStoreError> {
        match self.kv.get(&keys::meta_key(job_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Raw result blob as the worker stored it, or `None`.
    pub async fn get_result(&self, job_id: &str) -> Result<Option<String>, JobStoreError> {
        Ok(self.kv.get(&keys::result_key(job_id)).await?)
    }

    /// Insert at the head of the recency list and trim to the cap. The trim
    /// runs after every push, so concurrent pushes cannot leave the list
    /// over the cap for longer than one push.
    pub async fn push_recent(&self, job_id: &str) -> Result<(), JobStoreError> {
        self.kv.lpush(keys::RECENT_KEY, job_id).await?;
        self.kv
            .ltrim(keys::RECENT_KEY, 0, self.recent_cap as i64 - 1)
            .await?;
        Ok(())
    }

    /// Up to `limit` recent job ids, newest first.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<String>, JobStoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.kv.lrange(keys::RECENT_KEY, 0, limit as i64 - 1).await?)
    }
}
