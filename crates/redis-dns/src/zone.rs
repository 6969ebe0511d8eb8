//! Zone authority: apex identity plus the values read live from the store.

use std::sync::Arc;

use redis_dns_store::RecordStore;
use tracing::debug;
use tracing::warn;

use super::config::NameServerSource;
use super::config::ZoneConfig;
use super::constants::NAME_SERVER_DELIMITER;
use super::names::normalize_fqdn;

/// Authority data for the served zone.
///
/// The serial number and (optionally) the name-server list live in the store so
/// they can change without a restart; both are read on every call.
#[derive(Clone)]
pub struct ZoneAuthority {
    store: Arc<dyn RecordStore>,
    zone: Arc<ZoneConfig>,
}

impl ZoneAuthority {
    /// Create the authority for `zone`.
    pub fn new(store: Arc<dyn RecordStore>, zone: Arc<ZoneConfig>) -> Self {
        Self { store, zone }
    }

    /// Zone configuration.
    pub fn config(&self) -> &ZoneConfig {
        &self.zone
    }

    /// Current zone serial. Missing, unreadable or non-numeric values yield 0.
    pub async fn current_serial(&self) -> u32 {
        let key = &self.zone.serial_key;
        match self.read_text(key).await {
            Some(text) => text.trim().parse::<u32>().unwrap_or_else(|e| {
                warn!(key = %key, value = %text, error = %e, "serial number is not a u32, using 0");
                0
            }),
            None => {
                debug!(key = %key, "no serial number stored, using 0");
                0
            }
        }
    }

    /// Name servers for the zone, in configured or stored order.
    pub async fn name_servers(&self) -> Vec<String> {
        match &self.zone.name_servers {
            NameServerSource::Static(servers) => servers.clone(),
            NameServerSource::Store { key } => match self.read_text(key).await {
                Some(text) => parse_name_servers(&text),
                None => {
                    debug!(key = %key, "no name servers stored");
                    Vec::new()
                }
            },
        }
    }

    /// Primary name server for SOA MNAME: the first name server, or our own hostname.
    pub async fn primary_name_server(&self) -> String {
        self.name_servers().await.into_iter().next().unwrap_or_else(|| self.zone.hostname.clone())
    }

    async fn read_text(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(key = %key, error = %e, "stored value is not UTF-8");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "record store lookup failed");
                None
            }
        }
    }
}

fn parse_name_servers(text: &str) -> Vec<String> {
    text.split(NAME_SERVER_DELIMITER)
        .map(str::trim)
        .filter(|server| !server.is_empty())
        .map(normalize_fqdn)
        .collect()
}
