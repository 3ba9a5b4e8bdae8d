//! Log record representation accepted by the syslog writers.
//!
//! A [`SyslogRecord`] carries one log event for the duration of a single
//! `write` call: its priority, raw body, the emitting source and the instant
//! the event happened.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::priority::Priority;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyslogRecord {
    /// Facility and severity of the event.
    pub priority: Priority,
    /// Message body. Arbitrary bytes, including newlines.
    pub message: Vec<u8>,
    /// Component that produced the record (e.g. `App` or `RTR`).
    pub source: String,
    /// Instance or process tag within `source`.
    pub source_id: Option<String>,
    /// Time the event happened.
    pub timestamp: SystemTime,
}

impl SyslogRecord {
    /// Construct a record stamped with the current time.
    pub fn new(priority: Priority, message: impl Into<Vec<u8>>, source: &str) -> Self {
        Self {
            priority,
            message: message.into(),
            source: source.to_owned(),
            source_id: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Attach a source instance tag. Empty tags are treated as absent.
    pub fn with_source_id(mut self, source_id: &str) -> Self {
        self.source_id = (!source_id.is_empty()).then(|| source_id.to_owned());
        self
    }

    /// Override the event time.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Override the event time with nanoseconds since the Unix epoch.
    ///
    /// Negative values address instants before 1970.
    pub fn with_unix_nanos(self, nanos: i64) -> Self {
        let offset = Duration::from_nanos(nanos.unsigned_abs());
        let timestamp = if nanos >= 0 {
            UNIX_EPOCH + offset
        } else {
            UNIX_EPOCH - offset
        };
        self.with_timestamp(timestamp)
    }
}
