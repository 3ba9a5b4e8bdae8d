//! Syslog facility, severity, and the combined priority value.

use std::fmt;

use crate::error::SyslogWriterError;

/// Largest valid priority: facility `local7` (23) with severity `debug` (7).
pub const MAX_PRIORITY: u8 = 191;

/// Syslog severity levels (RFC 5424 section 6.2.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    Debug = 7,
}

impl Severity {
    const ALL: [Self; 8] = [
        Self::Emergency,
        Self::Alert,
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Informational,
        Self::Debug,
    ];

    fn from_code(code: u8) -> Self {
        Self::ALL[usize::from(code & 0x07)]
    }
}

/// Syslog facilities (RFC 5424 section 6.2.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Facility {
    Kernel = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    AuthPriv = 10,
    Ftp = 11,
    Ntp = 12,
    Audit = 13,
    Alert = 14,
    Clock = 15,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl Facility {
    const ALL: [Self; 24] = [
        Self::Kernel,
        Self::User,
        Self::Mail,
        Self::Daemon,
        Self::Auth,
        Self::Syslog,
        Self::Lpr,
        Self::News,
        Self::Uucp,
        Self::Cron,
        Self::AuthPriv,
        Self::Ftp,
        Self::Ntp,
        Self::Audit,
        Self::Alert,
        Self::Clock,
        Self::Local0,
        Self::Local1,
        Self::Local2,
        Self::Local3,
        Self::Local4,
        Self::Local5,
        Self::Local6,
        Self::Local7,
    ];
}

/// Combined facility and severity code, `facility * 8 + severity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u8);

impl Priority {
    /// Validate a raw numeric priority.
    pub fn new(value: u8) -> Result<Self, SyslogWriterError> {
        if value > MAX_PRIORITY {
            return Err(SyslogWriterError::InvalidPriority(value));
        }
        Ok(Self(value))
    }

    /// Combine a facility and a severity.
    pub fn from_parts(facility: Facility, severity: Severity) -> Self {
        Self((facility as u8) * 8 + severity as u8)
    }

    /// Raw numeric value as written inside `<...>`.
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn facility(self) -> Facility {
        // `new` bounds the value, so the index is always in range.
        Facility::ALL[usize::from(self.0 >> 3)]
    }

    pub fn severity(self) -> Severity {
        Severity::from_code(self.0)
    }
}

impl TryFrom<u8> for Priority {
    type Error = SyslogWriterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
