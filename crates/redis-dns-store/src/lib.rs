//! Key-value store adapters for redis-dns.
//!
//! The DNS engine only ever asks one question of its backing store: "what
//! bytes are stored under this key?". [`RecordStore`] captures that, and this
//! crate provides two implementations:
//!
//! - [`RedisRecordStore`]: production adapter over a multiplexed, reconnecting
//!   Redis connection. Cheap to clone and safe to share between the UDP and TCP
//!   listeners without extra locking.
//! - [`InMemoryRecordStore`]: deterministic map used by tests and local runs.
//!
//! A missing key is `Ok(None)`, never an error. Errors are reserved for
//! connectivity or command failures; callers decide how to degrade.

mod error;
mod memory;
mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::StoreError;
pub use error::StoreResult;
pub use memory::InMemoryRecordStore;
pub use redis_store::RedisRecordStore;

/// Read access to the key-value store holding DNS record data.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the raw value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }
}
