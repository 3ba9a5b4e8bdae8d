//! Syslog over TLS.
//!
//! [`TlsSyslogWriter`] owns one encrypted connection to a single collector.
//! Each `write` formats a [`SyslogRecord`](crate::log_record::SyslogRecord)
//! as an RFC 5424 message, frames it with RFC 6587 octet counting, and sends
//! it with one transport write. Certificate handling is chosen per writer
//! through [`TrustPolicy`]; dial and handshake timeouts come from
//! [`WriterConfig`].

mod config;
mod transport;
mod writer;


pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_FRAME_SIZE, DEFAULT_TLS_PORT, DEFAULT_WRITE_TIMEOUT,
    InvalidTrustPolicy, TlsOptions, TrustPolicy, WriterConfig, local_hostname,
};
pub use writer::TlsSyslogWriter;
