//! Syslog writers delivering log records to a remote collector.
//!
//! The crate currently ships one writer, [`TlsSyslogWriter`], which speaks
//! RFC 5424 over TLS (RFC 5425) to destinations of the form
//! `syslog-tls://host:port`. Writers share the [`SyslogWriter`] contract:
//! construct, `connect`, `write` any number of [`SyslogRecord`]s, `close`.
//!
//! ```no_run
//! use syslogwriter::{Priority, SyslogRecord, TlsWriterBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let writer = TlsWriterBuilder::new()
//!     .with_destination("syslog-tls://logs.example.com:6514")
//!     .with_app_id("billing")
//!     .build()?;
//! writer.connect()?;
//! writer.write(&SyslogRecord::new(Priority::new(14)?, "payment settled", "App").with_source_id("0"))?;
//! writer.close();
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod decode;
pub mod destination;
pub mod error;
pub mod formatter;
pub mod log_record;
pub mod priority;
pub mod tls_writer;
pub mod writer;

pub use builder::{TlsWriterBuilder, TlsWriterSettings};
pub use decode::{DecodeError, SyslogFrame, decode_frame, decode_message};
pub use destination::{DestinationDescriptor, PLAIN_SCHEME, TLS_SCHEME, validate_scheme};
pub use error::{BuildError, SyslogWriterError};
pub use formatter::{Rfc5424Formatter, SyslogFormatter, encode_frame, frame_octet_counted};
pub use log_record::SyslogRecord;
pub use priority::{Facility, Priority, Severity};
pub use tls_writer::{TlsOptions, TlsSyslogWriter, TrustPolicy, WriterConfig};
pub use writer::SyslogWriter;
