//! In-memory KvStore with lazy TTL expiry (tests and local runs).

use sim_types::{KvStore, KvStoreError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory implementation of KvStore. Expired entries are dropped on read;
/// list keys have no TTL, matching how the Redis layout uses them.
pub struct InMemoryKvStore {
    values: Arc<RwLock<HashMap<String, Entry>>>,
    lists: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            lists: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolve Redis-style inclusive indices against a list of `len`
    /// elements. `None` means the range selects nothing.
    fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
        let len = len as i64;
        let mut start = if start < 0 { len + start } else { start };
        let mut stop = if stop < 0 { len + stop } else { stop };
        if start < 0 {
            start = 0;
        }
        if stop >= len {
            stop = len - 1;
        }
        if len == 0 || start >= len || start > stop {
            return None;
        }
        Some((start as usize, stop as usize))
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl KvStore for InMemoryKvStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), KvStoreError> {
        let mut guard = self.values.write().await;
        guard.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        let mut guard = self.values.write().await;
        let expired = match guard.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()))
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            guard.remove(key);
        }
        Ok(None)
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let mut guard = self.lists.write().await;
        guard
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let mut guard = self.lists.write().await;
        guard
            .entry(key.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), KvStoreError> {
        let mut guard = self.lists.write().await;
        if let Some(list) = guard.get_mut(key) {
            match Self::resolve_range(list.len(), start, stop) {
                Some((start, stop)) => {
                    list.truncate(stop + 1);
                    list.drain(..start);
                }
                // Redis removes the key when the trim range is empty.
                None => {
                    guard.remove(key);
                }
            }
        }
        Ok(())
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, KvStoreError> {
        let guard = self.lists.read().await;
        let Some(list) = guard.get(key) else {
            return Ok(Vec::new());
        };
        match Self::resolve_range(list.len(), start, stop) {
            Some((start, stop)) => Ok(list[start..=stop].to_vec()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_roundtrip() {
        let kv = InMemoryKvStore::new();
        kv.set_with_ttl("k", "v", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(kv.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let kv = InMemoryKvStore::new();
        kv.set_with_ttl("k", "v", Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_prior_value() {
        let kv = InMemoryKvStore::new();
        kv.set_with_ttl("k", "old", Duration::from_secs(60))
            .await
            .unwrap();
        kv.set_with_ttl("k", "new", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn lpush_is_newest_first_rpush_is_fifo() {
        let kv = InMemoryKvStore::new();
        kv.lpush("heads", "a").await.unwrap();
        kv.lpush("heads", "b").await.unwrap();
        assert_eq!(kv.lrange("heads", 0, -1).await.unwrap(), vec!["b", "a"]);

        kv.rpush("tails", "a").await.unwrap();
        kv.rpush("tails", "b").await.unwrap();
        assert_eq!(kv.lrange("tails", 0, -1).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn ltrim_caps_list_length() {
        let kv = InMemoryKvStore::new();
        for i in 0..5 {
            kv.lpush("l", &i.to_string()).await.unwrap();
        }
        kv.ltrim("l", 0, 2).await.unwrap();
        assert_eq!(kv.lrange("l", 0, -1).await.unwrap(), vec!["4", "3", "2"]);
    }

    #[tokio::test]
    async fn lrange_clamps_out_of_bounds_stop() {
        let kv = InMemoryKvStore::new();
        kv.rpush("l", "only").await.unwrap();
        assert_eq!(kv.lrange("l", 0, 49).await.unwrap(), vec!["only"]);
        assert!(kv.lrange("l", 5, 9).await.unwrap().is_empty());
        assert!(kv.lrange("empty", 0, 49).await.unwrap().is_empty());
    }
}
