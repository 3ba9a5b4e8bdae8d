use crate::{error::SyslogWriterError, log_record::SyslogRecord};

/// Contract shared by all syslog writers.
///
/// A writer owns at most one connection to a single destination. Callers
/// `connect`, issue any number of `write` calls, and finally `close`. Every
/// operation runs on the caller's thread and may block on network I/O;
/// writers never reconnect or retry on their own.
///
/// Implementations are `Send + Sync` and serialise access to the underlying
/// connection so frames from concurrent callers never interleave.
pub trait SyslogWriter: Send + Sync {
    /// Open the connection to the destination.
    fn connect(&self) -> Result<(), SyslogWriterError>;

    /// Format `record` as one frame and send it, returning the bytes written.
    fn write(&self, record: &SyslogRecord) -> Result<usize, SyslogWriterError>;

    /// Release the connection. Safe to call repeatedly or before `connect`.
    fn close(&self);

    /// Whether a connection is currently held.
    fn is_connected(&self) -> bool;
}
