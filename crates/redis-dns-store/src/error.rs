//! Error types for store operations.

use snafu::Snafu;

/// Errors returned by a [`RecordStore`](crate::RecordStore).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    /// Could not open a client or establish the connection.
    #[snafu(display("failed to connect to store at {url}: {source}"))]
    Connect {
        /// Connection URL with any password removed.
        url: String,
        /// Underlying client error.
        source: redis::RedisError,
    },

    /// A command against the store failed.
    #[snafu(display("store command for key '{key}' failed: {source}"))]
    Command {
        /// The key the command addressed.
        key: String,
        /// Underlying client error.
        source: redis::RedisError,
    },

    /// The store cannot serve requests right now.
    #[snafu(display("store unavailable: {reason}"))]
    Unavailable {
        /// Description of why the store is unavailable.
        reason: String,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
