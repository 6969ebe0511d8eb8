//! Zone configuration.

use super::constants::DEFAULT_TTL;
use super::constants::MX_PREFERENCE;
use super::constants::NAME_SERVERS_KEY;
use super::constants::SERIAL_NUMBER_KEY;
use super::constants::SOA_EXPIRE;
use super::constants::SOA_MINIMUM;
use super::constants::SOA_REFRESH;
use super::constants::SOA_RETRY;
use super::constants::SOA_TTL;
use super::constants::WILDCARD_DEPTH_MARGIN;
use super::error::DnsError;
use super::error::DnsResult;
use super::names::normalize_fqdn;
use super::names::validate_domain;
use super::names::validate_mailbox;

/// Where the zone's name-server list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameServerSource {
    /// Fixed list from configuration.
    Static(Vec<String>),
    /// Comma-separated list read from the store on every use.
    Store {
        /// Store key holding the list.
        key: String,
    },
}

impl Default for NameServerSource {
    fn default() -> Self {
        NameServerSource::Store {
            key: NAME_SERVERS_KEY.to_string(),
        }
    }
}

impl NameServerSource {
    /// Static list when `servers` is non-empty, otherwise the default store key.
    pub fn from_list(servers: Vec<String>) -> Self {
        if servers.is_empty() {
            Self::default()
        } else {
            NameServerSource::Static(servers.iter().map(|s| normalize_fqdn(s)).collect())
        }
    }
}

/// Immutable zone settings, built once at startup and shared behind an `Arc`.
///
/// Names are stored normalized: lower-case and ending in `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneConfig {
    /// Apex domain this server is authoritative for.
    pub apex: String,
    /// This server's own hostname. Used as SOA MNAME when no name servers are known.
    pub hostname: String,
    /// Administrative mailbox in dotted form.
    pub mailbox: String,
    /// TTL applied to records stored with `ttl = 0`.
    pub default_ttl: u32,
    /// Preference of synthesized MX records.
    pub mx_preference: u16,
    /// SOA refresh interval.
    pub soa_refresh: u32,
    /// SOA retry interval.
    pub soa_retry: u32,
    /// SOA expire interval.
    pub soa_expire: u32,
    /// SOA minimum TTL.
    pub soa_minimum: u32,
    /// TTL of synthesized SOA records.
    pub soa_ttl: u32,
    /// Store key holding the serial number.
    pub serial_key: String,
    /// Source of the name-server list.
    pub name_servers: NameServerSource,
    /// Labels a name needs beyond `apex + 1` before wildcard fallback is tried.
    ///
    /// With margin `m`, a wildcard lookup happens only when
    /// `labels(name) > labels(apex) + m`.
    pub wildcard_depth_margin: usize,
}

impl ZoneConfig {
    /// Build a zone with default timers and the store-backed name-server list.
    ///
    /// # Errors
    ///
    /// Returns an error if any name is empty or malformed, or if `mailbox`
    /// contains `@`.
    pub fn new(apex: &str, hostname: &str, mailbox: &str) -> DnsResult<Self> {
        Ok(Self {
            apex: validate_domain(apex)?,
            hostname: validate_domain(hostname)?,
            mailbox: validate_mailbox(mailbox)?,
            default_ttl: DEFAULT_TTL,
            mx_preference: MX_PREFERENCE,
            soa_refresh: SOA_REFRESH,
            soa_retry: SOA_RETRY,
            soa_expire: SOA_EXPIRE,
            soa_minimum: SOA_MINIMUM,
            soa_ttl: SOA_TTL,
            serial_key: SERIAL_NUMBER_KEY.to_string(),
            name_servers: NameServerSource::default(),
            wildcard_depth_margin: WILDCARD_DEPTH_MARGIN,
        })
    }

    /// Set the default TTL. Zero is rejected.
    pub fn with_default_ttl(mut self, ttl: u32) -> DnsResult<Self> {
        if ttl == 0 {
            return Err(DnsError::InvalidConfig {
                reason: "default TTL must be greater than zero".to_string(),
            });
        }
        self.default_ttl = ttl;
        Ok(self)
    }

    /// Set the name-server source.
    pub fn with_name_servers(mut self, source: NameServerSource) -> Self {
        self.name_servers = source;
        self
    }

    /// Set the wildcard depth margin.
    pub fn with_wildcard_depth_margin(mut self, margin: usize) -> Self {
        self.wildcard_depth_margin = margin;
        self
    }

    /// Whether `name` is the zone apex. `name` must be normalized.
    pub fn is_apex(&self, name: &str) -> bool {
        name == self.apex
    }
}
