//! Redis-backed KvStore.
//!
//! Uses the synchronous redis client driven through `spawn_blocking`; every
//! connection carries read/write timeouts so a slow or unreachable Redis
//! fails the calling request instead of hanging it.

use sim_types::{KvStore, KvStoreError};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct RedisKvStore {
    client: Arc<redis::Client>,
    op_timeout: Duration,
}

impl RedisKvStore {
    /// Connect lazily to `redis_url` (e.g. "redis://localhost:6379").
    /// `op_timeout` bounds connect, read and write for every operation.
    pub fn new(redis_url: impl AsRef<str>, op_timeout: Duration) -> Result<Self, KvStoreError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| KvStoreError::Connection(e.to_string()))?;
        Ok(Self {
            client: Arc::new(client),
            op_timeout,
        })
    }

    /// Round-trip a PING, for startup checks.
    pub async fn ping(&self) -> Result<(), KvStoreError> {
        self.run(move |conn| {
            redis::cmd("PING")
                .query::<String>(conn)
                .map_err(|e| KvStoreError::Command(format!("PING failed: {e}")))?;
            Ok(())
        })
        .await
    }

    fn connect(&self) -> Result<redis::Connection, KvStoreError> {
        let conn = self
            .client
            .get_connection_with_timeout(self.op_timeout)
            .map_err(|e| KvStoreError::Connection(e.to_string()))?;
        conn.set_read_timeout(Some(self.op_timeout))
            .map_err(|e| KvStoreError::Connection(e.to_string()))?;
        conn.set_write_timeout(Some(self.op_timeout))
            .map_err(|e| KvStoreError::Connection(e.to_string()))?;
        Ok(conn)
    }

    /// Run a blocking redis command off the async runtime.
    async fn run<T, F>(&self, f: F) -> Result<T, KvStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut redis::Connection) -> Result<T, KvStoreError> + Send + 'static,
    {
        let this = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = this.connect()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| KvStoreError::Command(format!("blocking task failed: {e}")))?
    }
}

#[async_trait::async_trait]
impl KvStore for RedisKvStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), KvStoreError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.run(move |conn| {
            redis::cmd("SET")
                .arg(&key)
                .arg(&value)
                .arg("EX")
                .arg(ttl.as_secs().max(1))
                .query::<()>(conn)
                .map_err(|e| KvStoreError::Command(format!("SET failed: {e}")))
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        let key = key.to_string();
        self.run(move |conn| {
            redis::cmd("GET")
                .arg(&key)
                .query::<Option<String>>(conn)
                .map_err(|e| KvStoreError::Command(format!("GET failed: {e}")))
        })
        .await
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.run(move |conn| {
            redis::cmd("RPUSH")
                .arg(&key)
                .arg(&value)
                .query::<i64>(conn)
                .map_err(|e| KvStoreError::Command(format!("RPUSH failed: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.run(move |conn| {
            redis::cmd("LPUSH")
                .arg(&key)
                .arg(&value)
                .query::<i64>(conn)
                .map_err(|e| KvStoreError::Command(format!("LPUSH failed: {e}")))?;
            Ok(())
        })
        .await
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), KvStoreError> {
        let key = key.to_string();
        self.run(move |conn| {
            redis::cmd("LTRIM")
                .arg(&key)
                .arg(start)
                .arg(stop)
                .query::<()>(conn)
                .map_err(|e| KvStoreError::Command(format!("LTRIM failed: {e}")))
        })
        .await
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, KvStoreError> {
        let key = key.to_string();
        self.run(move |conn| {
            redis::cmd("LRANGE")
                .arg(&key)
                .arg(start)
                .arg(stop)
                .query::<Vec<String>>(conn)
                .map_err(|e| KvStoreError::Command(format!("LRANGE failed: {e}")))
        })
        .await
    }
}
