//! In-memory record store.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::RecordStore;
use crate::error::StoreError;
use crate::error::StoreResult;

/// A deterministic in-memory key-value store.
///
/// Thread-safe; intended for tests and for running the server without a Redis
/// instance. [`set_unavailable`](Self::set_unavailable) makes every read fail,
/// which lets callers exercise their store-error paths.
#[derive(Default)]
pub struct InMemoryRecordStore {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
    unavailable: AtomicBool,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.data.write().await.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its previous value.
    pub async fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.data.write().await.remove(key)
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Toggle simulated unavailability.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable {
                reason: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(self.data.read().await.get(key).cloned())
    }
}
