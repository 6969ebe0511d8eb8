//! Authoritative DNS resolution over a key-value record store.
//!
//! Records are JSON documents stored under their fully-qualified hostname
//! (`www.example.com.`). A query is answered from the exact key when present,
//! otherwise from the wildcard key one level up (`*.example.com.`) when the
//! name is deep enough below the apex.
//!
//! # Architecture
//!
//! ```text
//! hickory-server (UDP + TCP)
//!         |
//!         v
//! DnsRequestHandler ---- per question ----+
//!         |                               |
//!         v                               v
//! Resolver (exact, then wildcard)    AnswerBuilder (per query type)
//!         |                               |
//!         v                               v
//! RecordStore <-------------------- ZoneAuthority (serial, name servers)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use redis_dns::{DnsProtocolServer, DnsRequestHandler, ZoneConfig};
//! use redis_dns_store::RedisRecordStore;
//!
//! let store = Arc::new(RedisRecordStore::connect("redis://127.0.0.1:6379").await?);
//! let zone = ZoneConfig::new("example.com", "ns1.example.com", "hostmaster.example.com")?;
//! let handler = DnsRequestHandler::new(store, zone);
//! let server = DnsProtocolServer::bind("0.0.0.0:53".parse()?, handler, Duration::from_secs(30)).await?;
//! server.run().await?;
//! ```

pub mod answer;
pub mod config;
pub mod constants;
pub mod error;
pub mod handler;
pub mod names;
pub mod resolver;
pub mod server;
pub mod types;
pub mod zone;

pub use answer::AnswerBuilder;
pub use config::NameServerSource;
pub use config::ZoneConfig;
pub use error::DnsError;
pub use error::DnsResult;
pub use handler::DnsRequestHandler;
pub use resolver::Resolver;
pub use server::DnsProtocolServer;
pub use types::Answer;
pub use types::AnswerData;
pub use types::QueryType;
pub use types::Record;
pub use types::SoaData;
pub use zone::ZoneAuthority;
