//! CLI argument parsing for redis-dns-server.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "redis-dns-server", version, about = "Authoritative DNS server backed by Redis")]
pub struct Args {
    /// Path to TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Redis connection URL: redis://[:password@]host:port[/db].
    #[arg(long)]
    pub redis_server_url: Option<String>,

    /// Serve records from process memory instead of Redis. Without
    /// --seed-file the store starts empty and every answer is negative.
    #[arg(long)]
    pub memory_store: bool,

    /// JSON file mapping store keys to records (or raw strings), written to
    /// the store at startup.
    #[arg(long)]
    pub seed_file: Option<PathBuf>,

    /// Apex domain this server is authoritative for.
    #[arg(long)]
    pub domain: Option<String>,

    /// Public hostname of *this* server. Defaults to the machine hostname.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Administrative mailbox, dotted form without '@' (hostmaster.example.com).
    #[arg(long)]
    pub mbox: Option<String>,

    /// Address to listen on.
    #[arg(long)]
    pub bind_addr: Option<IpAddr>,

    /// Port to listen on for UDP and TCP.
    #[arg(long)]
    pub port: Option<u16>,

    /// Name server for the zone. Repeat for several; when absent the list is
    /// read from the store.
    #[arg(long = "name-server")]
    pub name_servers: Vec<String>,

    /// TTL for records stored without one.
    #[arg(long)]
    pub default_ttl: Option<u32>,

    /// Idle timeout for TCP connections, in seconds.
    #[arg(long)]
    pub tcp_timeout_secs: Option<u64>,

    /// Labels a name needs beyond the apex plus this margin before wildcard
    /// fallback is tried.
    #[arg(long)]
    pub wildcard_depth_margin: Option<usize>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The command-line layer of the configuration.
    pub fn to_config(&self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            redis_url: self.redis_server_url.clone(),
            memory_store: self.memory_store,
            seed_file: self.seed_file.clone(),
            domain: self.domain.clone(),
            hostname: self.hostname.clone(),
            mbox: self.mbox.clone(),
            bind_addr: self.bind_addr.unwrap_or(defaults.bind_addr),
            port: self.port.unwrap_or(defaults.port),
            name_servers: self.name_servers.clone(),
            default_ttl: self.default_ttl.unwrap_or(defaults.default_ttl),
            tcp_timeout_secs: self.tcp_timeout_secs.unwrap_or(defaults.tcp_timeout_secs),
            wildcard_depth_margin: self.wildcard_depth_margin.unwrap_or(defaults.wildcard_depth_margin),
        }
    }
}
