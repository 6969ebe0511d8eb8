//! Error types for DNS operations.

use std::net::SocketAddr;

use snafu::Snafu;

/// Errors raised while configuring or running the DNS server.
///
/// Per-query failures never surface here: lookups degrade to "not found".
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DnsError {
    /// A configured name is empty or malformed.
    #[snafu(display("invalid domain name '{name}': {reason}"))]
    InvalidName {
        /// The offending name.
        name: String,
        /// Description of why the name is invalid.
        reason: String,
    },

    /// The administrative mailbox is not in dotted form.
    #[snafu(display("invalid mailbox '{mbox}': use dotted form (hostmaster.example.com), not an '@' address"))]
    InvalidMailbox {
        /// The offending mailbox.
        mbox: String,
    },

    /// A zone setting is out of range.
    #[snafu(display("invalid zone configuration: {reason}"))]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Binding a listener failed.
    #[snafu(display("failed to bind DNS listener on {addr}: {source}"))]
    Bind {
        /// Address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The protocol server stopped with an error.
    #[snafu(display("DNS server failed: {reason}"))]
    Server {
        /// Description of the failure.
        reason: String,
    },
}

/// Result type for DNS server operations.
pub type DnsResult<T> = Result<T, DnsError>;
