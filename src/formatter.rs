//! RFC 5424 message formatting and RFC 6587 octet-counted framing.
//!
//! A record becomes `<PRI>1 TIMESTAMP HOSTNAME APP-NAME PROCID - - MSG`.
//! The frame on the wire prefixes that message with its decimal byte length
//! and a space, so bodies may contain newlines or any other byte without
//! escaping.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use crate::{error::SyslogWriterError, log_record::SyslogRecord};

/// Protocol version written after the priority.
pub const SYSLOG_VERSION: u8 = 1;
/// Placeholder for absent header fields.
pub const NIL: &str = "-";

pub const MAX_HOSTNAME_LEN: usize = 255;
pub const MAX_APP_NAME_LEN: usize = 48;
pub const MAX_PROC_ID_LEN: usize = 128;

/// Trait for turning a record into a syslog message (unframed).
///
/// Implementors must be thread-safe (`Send + Sync`) so a formatter can be
/// shared by writers used from several threads.
pub trait SyslogFormatter: Send + Sync {
    /// Format a record into the bytes of one syslog message.
    fn format(&self, record: &SyslogRecord) -> Vec<u8>;
}

/// RFC 5424 formatter with a fixed hostname and application name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rfc5424Formatter {
    hostname: String,
    app_name: String,
}

impl Rfc5424Formatter {
    /// Both fields are sanitised once here rather than on every record.
    pub fn new(hostname: &str, app_name: &str) -> Self {
        Self {
            hostname: header_field(hostname, MAX_HOSTNAME_LEN),
            app_name: header_field(app_name, MAX_APP_NAME_LEN),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl SyslogFormatter for Rfc5424Formatter {
    fn format(&self, record: &SyslogRecord) -> Vec<u8> {
        let header = format!(
            "<{}>{SYSLOG_VERSION} {} {} {} {} {NIL} {NIL} ",
            record.priority,
            format_timestamp(record.timestamp),
            self.hostname,
            self.app_name,
            proc_id(record),
        );
        let mut message = Vec::with_capacity(header.len() + record.message.len());
        message.extend_from_slice(header.as_bytes());
        message.extend_from_slice(&record.message);
        message
    }
}

/// RFC 3339 timestamp in UTC with nanoseconds and an explicit `+00:00` offset.
///
/// Nine fractional digits are written on purpose to keep the record's full
/// precision, although RFC 5424 `TIME-SECFRAC` allows at most six; collectors
/// that enforce the limit will reject these timestamps. Instants chrono
/// cannot represent become [`NIL`].
pub fn format_timestamp(timestamp: SystemTime) -> String {
    utc_datetime(timestamp).map_or_else(
        || NIL.to_owned(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Nanos, false),
    )
}

fn utc_datetime(timestamp: SystemTime) -> Option<DateTime<Utc>> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    match timestamp.duration_since(UNIX_EPOCH) {
        Ok(after) => epoch.checked_add_signed(TimeDelta::from_std(after).ok()?),
        Err(err) => epoch.checked_sub_signed(TimeDelta::from_std(err.duration()).ok()?),
    }
}

fn proc_id(record: &SyslogRecord) -> String {
    if record.source.is_empty() {
        return NIL.to_owned();
    }
    let tag = match record.source_id.as_deref() {
        Some(id) => format!("[{}/{id}]", record.source),
        None => format!("[{}]", record.source),
    };
    header_field(&tag, MAX_PROC_ID_LEN)
}

/// Restrict a header field to printable US-ASCII and `max_len` bytes.
///
/// Empty input becomes [`NIL`].
pub fn header_field(value: &str, max_len: usize) -> String {
    if value.is_empty() {
        return NIL.to_owned();
    }
    value
        .chars()
        .map(|c| if c.is_ascii_graphic() { c } else { '_' })
        .take(max_len)
        .collect()
}

/// Frame a message with its octet count, rejecting messages over `max_size`.
pub fn frame_octet_counted(message: &[u8], max_size: usize) -> Option<Vec<u8>> {
    if message.len() > max_size {
        return None;
    }
    let prefix = format!("{} ", message.len());
    let mut framed = Vec::with_capacity(prefix.len() + message.len());
    framed.extend_from_slice(prefix.as_bytes());
    framed.extend_from_slice(message);
    Some(framed)
}

/// Format and frame `record` in one step.
pub fn encode_frame(
    formatter: &dyn SyslogFormatter,
    record: &SyslogRecord,
    max_size: usize,
) -> Result<Vec<u8>, SyslogWriterError> {
    let message = formatter.format(record);
    frame_octet_counted(&message, max_size).ok_or(SyslogWriterError::FrameTooLarge {
        size: message.len(),
        limit: max_size,
    })
}
