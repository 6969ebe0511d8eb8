//! Redis-backed record store.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use snafu::ResultExt;
use tracing::debug;
use tracing::info;

use crate::RecordStore;
use crate::error::CommandSnafu;
use crate::error::ConnectSnafu;
use crate::error::StoreResult;

/// Record store backed by a Redis server.
///
/// Wraps a [`ConnectionManager`], which multiplexes commands over one
/// connection and reconnects on failure. Clones share that connection, so a
/// single instance can serve every listener concurrently.
#[derive(Clone)]
pub struct RedisRecordStore {
    conn: ConnectionManager,
}

impl RedisRecordStore {
    /// Connect to the Redis server at `url`.
    ///
    /// Accepts the standard `redis://[:password@]host:port[/db]` form.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let redacted = redact_url(url);
        let client = redis::Client::open(url).context(ConnectSnafu { url: redacted.clone() })?;
        let conn = ConnectionManager::new(client).await.context(ConnectSnafu { url: redacted.clone() })?;
        info!(url = %redacted, "connected to redis");
        Ok(Self { conn })
    }

    /// Store `value` under `key`.
    pub async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await.context(CommandSnafu { key })
    }
}

#[async_trait]
impl RecordStore for RedisRecordStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.context(CommandSnafu { key })?;
        debug!(key, found = value.is_some(), "redis get");
        Ok(value)
    }
}

/// Strip the password from a connection URL so it can be logged.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => url.to_string(),
    }
}
