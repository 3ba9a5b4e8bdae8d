//! Error types surfaced by the syslog writers.
//!
//! [`SyslogWriterError`] covers construction and the connect / write
//! lifecycle. [`BuildError`] is returned by
//! [`TlsWriterBuilder`](crate::builder::TlsWriterBuilder) when user supplied
//! configuration is rejected before a writer exists.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures raised by a syslog writer.
#[derive(Debug, Error)]
pub enum SyslogWriterError {
    /// The destination does not request the secure syslog transport.
    #[error("invalid scheme {scheme:?}: expected {expected:?}")]
    InvalidScheme {
        scheme: String,
        expected: &'static str,
    },
    /// The destination could not be parsed into host and port.
    #[error("invalid destination {url:?}: {reason}")]
    InvalidDestination { url: String, reason: String },
    /// Priority outside the syslog range `0..=191`.
    #[error("invalid syslog priority {0}: must be between 0 and 191")]
    InvalidPriority(u8),
    /// Certificate validation or TLS negotiation failed.
    #[error("TLS handshake with {address} failed: {source}")]
    TlsHandshake {
        address: String,
        #[source]
        source: io::Error,
    },
    /// The peer could not be reached.
    #[error("failed to connect to {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: io::Error,
    },
    /// An operation needing a live connection was attempted without one.
    #[error("syslog writer is not connected")]
    NotConnected,
    /// `connect` was called while a connection is still open.
    #[error("syslog writer is already connected to {address}")]
    AlreadyConnected { address: String },
    /// The transport rejected a frame.
    #[error("failed to write syslog frame to {address}: {source}")]
    Write {
        address: String,
        #[source]
        source: io::Error,
    },
    /// The formatted message exceeds the configured frame limit.
    #[error("syslog message of {size} bytes exceeds the {limit} byte frame limit")]
    FrameTooLarge { size: usize, limit: usize },
}

impl SyslogWriterError {
    /// Whether the caller may reasonably retry the failed operation as-is.
    ///
    /// Configuration and trust failures are permanent; network failures are
    /// not. The writer itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Write { .. })
    }
}

/// Errors that may occur while building a writer.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid user supplied configuration.
    #[error("invalid writer configuration: {0}")]
    InvalidConfig(String),
    /// The trust bundle could not be read or parsed.
    #[error("failed to load trust bundle {}: {source}", path.display())]
    TrustBundle {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The writer rejected the destination.
    #[error(transparent)]
    Writer(#[from] SyslogWriterError),
}
