//! Record lookup with wildcard fallback.
//!
//! Resolution order for a queried name `N`:
//!
//! 1. Exact key `N`.
//! 2. If `N` is deep enough below the apex, the wildcard key for `N`
//!    (`host.a.example.com.` → `*.a.example.com.`). Tried at most once.
//!
//! Store errors, undecodable values and records without data all count as a
//! miss at that key.

use std::sync::Arc;

use redis_dns_store::RecordStore;
use tracing::debug;
use tracing::warn;

use super::config::ZoneConfig;
use super::names::label_count;
use super::names::wildcard_key;
use super::types::Record;

/// Resolves queried names to stored records.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<dyn RecordStore>,
    zone: Arc<ZoneConfig>,
}

impl Resolver {
    /// Create a resolver over `store` for `zone`.
    pub fn new(store: Arc<dyn RecordStore>, zone: Arc<ZoneConfig>) -> Self {
        Self { store, zone }
    }

    /// Look up the record for `name` (a normalized FQDN).
    ///
    /// A returned record always has a non-zero TTL.
    pub async fn lookup(&self, name: &str) -> Option<Record> {
        if let Some(record) = self.fetch(name).await {
            return Some(self.apply_default_ttl(record));
        }

        if !self.wildcard_allowed(name) {
            debug!(name = %name, "no record; name too shallow for wildcard fallback");
            return None;
        }

        let key = wildcard_key(name);
        debug!(name = %name, wildcard = %key, "no exact record, trying wildcard");
        self.fetch(&key).await.map(|record| self.apply_default_ttl(record))
    }

    /// Wildcard fallback needs `labels(name) > labels(apex) + margin`.
    fn wildcard_allowed(&self, name: &str) -> bool {
        label_count(name) > label_count(&self.zone.apex) + self.zone.wildcard_depth_margin
    }

    async fn fetch(&self, key: &str) -> Option<Record> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "record store lookup failed");
                return None;
            }
        };

        match Record::from_json(&bytes) {
            Ok(record) if record.is_empty() => {
                debug!(key = %key, "stored record has no data");
                None
            }
            Ok(record) => Some(record),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to decode stored record");
                None
            }
        }
    }

    fn apply_default_ttl(&self, mut record: Record) -> Record {
        if record.ttl == 0 {
            record.ttl = self.zone.default_ttl;
        }
        record
    }
}
