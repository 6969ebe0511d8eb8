//! redis-dns-server: authoritative DNS answered from Redis.
//!
//! Configuration is layered: environment, then `--config` TOML, then flags.
//! Runs until the listeners fail or Ctrl-C is received.

mod args;
mod config;
mod seed;

use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use redis_dns::DnsProtocolServer;
use redis_dns::DnsRequestHandler;
use redis_dns_store::InMemoryRecordStore;
use redis_dns_store::RecordStore;
use redis_dns_store::RedisRecordStore;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = load_config(&args)?;
    let zone = config.zone_config().context("failed to build zone configuration")?;
    let store = open_store(&config).await?;

    info!(
        domain = %zone.apex,
        hostname = %zone.hostname,
        mbox = %zone.mailbox,
        addr = %config.listen_addr(),
        "serving DNS records"
    );

    let handler = DnsRequestHandler::new(store, zone);
    let server = DnsProtocolServer::bind(config.listen_addr(), handler, config.tcp_timeout())
        .await
        .context("failed to start DNS server")?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("DNS server failed")?;

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

/// Environment, then TOML file, then command-line flags.
fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = ServerConfig::from_env();
    if let Some(path) = &args.config {
        let file = ServerConfig::from_toml_file(path).context("failed to load config file")?;
        config.merge(file);
    }
    config.merge(args.to_config());
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Open the configured store and write the seed file into it, if any.
async fn open_store(config: &ServerConfig) -> Result<Arc<dyn RecordStore>> {
    let seed = match &config.seed_file {
        Some(path) => seed::load_seed_file(path).context("failed to load seed file")?,
        None => Vec::new(),
    };

    if config.memory_store {
        warn!("using in-memory record store; records are not persisted");
        if seed.is_empty() {
            warn!("in-memory record store has no seed file; every query will get a negative answer");
        }
        let store = InMemoryRecordStore::new();
        let entries = seed.len();
        for (key, value) in seed {
            store.set(key, value).await;
        }
        log_seeded(config, entries);
        return Ok(Arc::new(store));
    }

    let url = config.redis_url.as_deref().unwrap_or_default();
    let store = RedisRecordStore::connect(url).await.context("failed to connect to redis")?;
    for (key, value) in &seed {
        store.set(key, value).await.with_context(|| format!("failed to seed key '{key}'"))?;
    }
    log_seeded(config, seed.len());
    Ok(Arc::new(store))
}

fn log_seeded(config: &ServerConfig, entries: usize) {
    if let Some(path) = &config.seed_file {
        info!(entries, path = %path.display(), "seeded record store");
    }
}
