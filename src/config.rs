//! Server configuration.
//!
//! Layers, lowest precedence first:
//!
//! 1. Environment variables (`REDIS_DNS_<FIELD>`)
//! 2. TOML file given with `--config`
//! 3. Command-line flags
//!
//! Each layer only overrides what it sets; see [`ServerConfig::merge`].

use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use redis_dns::DnsError;
use redis_dns::NameServerSource;
use redis_dns::ZoneConfig;
use redis_dns::constants::DEFAULT_DNS_PORT;
use redis_dns::constants::DEFAULT_TTL;
use redis_dns::constants::TCP_REQUEST_TIMEOUT;
use redis_dns::constants::WILDCARD_DEPTH_MARGIN;
use serde::Deserialize;
use serde::Serialize;
use snafu::ResultExt;
use snafu::Snafu;

/// Prefix of every environment variable read by [`ServerConfig::from_env`].
pub const ENV_PREFIX: &str = "REDIS_DNS_";

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Redis connection URL, `redis://[:password@]host:port[/db]`.
    pub redis_url: Option<String>,

    /// Serve records from process memory instead of Redis.
    pub memory_store: bool,

    /// JSON file of keys to values loaded into the store at startup.
    pub seed_file: Option<PathBuf>,

    /// Apex domain this server is authoritative for.
    pub domain: Option<String>,

    /// Public hostname of this server. Defaults to the machine hostname.
    pub hostname: Option<String>,

    /// Administrative mailbox in dotted form. Defaults to `hostmaster.<domain>`.
    pub mbox: Option<String>,

    /// Address to listen on.
    pub bind_addr: IpAddr,

    /// Port to listen on (UDP and TCP).
    pub port: u16,

    /// Static name-server list. Empty means "read from the store".
    pub name_servers: Vec<String>,

    /// TTL for records stored with `ttl = 0`.
    pub default_ttl: u32,

    /// Idle timeout for TCP connections, in seconds.
    pub tcp_timeout_secs: u64,

    /// Extra labels a name needs beyond `apex + 1` before wildcard fallback.
    pub wildcard_depth_margin: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            memory_store: false,
            seed_file: None,
            domain: None,
            hostname: None,
            mbox: None,
            bind_addr: default_bind_addr(),
            port: DEFAULT_DNS_PORT,
            name_servers: Vec::new(),
            default_ttl: DEFAULT_TTL,
            tcp_timeout_secs: default_tcp_timeout_secs(),
            wildcard_depth_margin: WILDCARD_DEPTH_MARGIN,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        toml::from_str(&content).context(ParseTomlSnafu { path })
    }

    /// Load configuration from the process environment.
    ///
    /// Variables are named `REDIS_DNS_<FIELD>` in upper case, e.g.
    /// `REDIS_DNS_REDIS_URL`. `REDIS_DNS_NAME_SERVERS` is comma-separated.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |field: &str| lookup(&format!("{ENV_PREFIX}{field}"));
        let defaults = Self::default();

        Self {
            redis_url: var("REDIS_URL"),
            memory_store: parse_var(&var, "MEMORY_STORE").unwrap_or(defaults.memory_store),
            seed_file: var("SEED_FILE").map(PathBuf::from),
            domain: var("DOMAIN"),
            hostname: var("HOSTNAME"),
            mbox: var("MBOX"),
            bind_addr: parse_var(&var, "BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_var(&var, "PORT").unwrap_or(defaults.port),
            name_servers: var("NAME_SERVERS").map(|value| split_list(&value)).unwrap_or_default(),
            default_ttl: parse_var(&var, "DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            tcp_timeout_secs: parse_var(&var, "TCP_TIMEOUT_SECS").unwrap_or(defaults.tcp_timeout_secs),
            wildcard_depth_margin: parse_var(&var, "WILDCARD_DEPTH_MARGIN").unwrap_or(defaults.wildcard_depth_margin),
        }
    }

    /// Merge configuration from a higher-precedence source.
    ///
    /// Fields in `other` that are `Some`, non-empty or differ from the default
    /// override fields in `self`.
    pub fn merge(&mut self, other: Self) {
        let defaults = Self::default();

        if other.redis_url.is_some() {
            self.redis_url = other.redis_url;
        }
        if other.memory_store {
            self.memory_store = true;
        }
        if other.seed_file.is_some() {
            self.seed_file = other.seed_file;
        }
        if other.domain.is_some() {
            self.domain = other.domain;
        }
        if other.hostname.is_some() {
            self.hostname = other.hostname;
        }
        if other.mbox.is_some() {
            self.mbox = other.mbox;
        }
        if other.bind_addr != defaults.bind_addr {
            self.bind_addr = other.bind_addr;
        }
        if other.port != defaults.port {
            self.port = other.port;
        }
        if !other.name_servers.is_empty() {
            self.name_servers = other.name_servers;
        }
        if other.default_ttl != defaults.default_ttl {
            self.default_ttl = other.default_ttl;
        }
        if other.tcp_timeout_secs != defaults.tcp_timeout_secs {
            self.tcp_timeout_secs = other.tcp_timeout_secs;
        }
        if other.wildcard_depth_margin != defaults.wildcard_depth_margin {
            self.wildcard_depth_margin = other.wildcard_depth_margin;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if required fields are missing or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.memory_store && self.redis_url.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Validation {
                message: "redis_url is required (or enable memory_store)".into(),
            });
        }

        if self.domain.as_deref().is_none_or(|domain| domain.trim().is_empty()) {
            return Err(ConfigError::Validation {
                message: "domain is required".into(),
            });
        }

        if let Some(mbox) = &self.mbox
            && mbox.contains('@')
        {
            return Err(ConfigError::Validation {
                message: format!("mbox '{mbox}' must use dotted form (hostmaster.example.com), not '@'"),
            });
        }

        if self.default_ttl == 0 {
            return Err(ConfigError::Validation {
                message: "default_ttl must be non-zero".into(),
            });
        }

        if self.tcp_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                message: "tcp_timeout_secs must be non-zero".into(),
            });
        }

        Ok(())
    }

    /// Socket address the listeners bind to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// TCP idle timeout.
    pub fn tcp_timeout(&self) -> Duration {
        Duration::from_secs(self.tcp_timeout_secs)
    }

    /// Configured hostname, or the machine hostname when unset.
    pub fn resolved_hostname(&self) -> Result<String, ConfigError> {
        if let Some(hostname) = &self.hostname {
            return Ok(hostname.clone());
        }
        let hostname = hostname::get().context(HostnameSnafu)?;
        Ok(hostname.to_string_lossy().into_owned())
    }

    /// Build the zone served by this configuration.
    ///
    /// Call [`validate`](Self::validate) first.
    pub fn zone_config(&self) -> Result<ZoneConfig, ConfigError> {
        let domain = self.domain.as_deref().unwrap_or_default().trim();
        let mbox = match &self.mbox {
            Some(mbox) => mbox.clone(),
            None => format!("hostmaster.{}", domain.trim_end_matches('.')),
        };
        let hostname = self.resolved_hostname()?;

        let zone = ZoneConfig::new(domain, &hostname, &mbox)
            .and_then(|zone| zone.with_default_ttl(self.default_ttl))
            .context(ZoneSnafu)?
            .with_name_servers(NameServerSource::from_list(self.name_servers.clone()))
            .with_wildcard_depth_margin(self.wildcard_depth_margin);
        Ok(zone)
    }
}

fn default_bind_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_tcp_timeout_secs() -> u64 {
    TCP_REQUEST_TIMEOUT.as_secs()
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, field: &str) -> Option<T> {
    var(field)?.trim().parse().ok()
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Configuration loading and parsing errors.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("failed to read config file {}: {source}", path.display()))]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[snafu(display("failed to parse TOML config file {}: {source}", path.display()))]
    ParseToml { path: PathBuf, source: toml::de::Error },

    #[snafu(display("failed to determine the machine hostname: {source}"))]
    Hostname { source: std::io::Error },

    #[snafu(display("invalid zone settings: {source}"))]
    Zone { source: DnsError },

    #[snafu(display("configuration validation failed: {message}"))]
    Validation { message: String },
}
