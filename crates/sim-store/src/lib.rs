//! KvStore backends for the simulation job API.

mod memory;
#[cfg(feature = "redis")]
mod redis_store;

pub use memory::InMemoryKvStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisKvStore;
