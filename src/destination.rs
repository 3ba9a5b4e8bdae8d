//! Destination descriptors and scheme validation.
//!
//! A destination is written as a URL such as `syslog-tls://logs.example.com:6514`.
//! Parsing accepts any scheme so that callers get a structured value back;
//! each writer then checks the scheme with [`validate_scheme`] before it is
//! constructed. No name resolution happens here.

use std::{fmt, net::IpAddr, str::FromStr};

use url::{Host, Url};

use crate::error::SyslogWriterError;

/// Scheme identifying syslog over TLS.
pub const TLS_SCHEME: &str = "syslog-tls";
/// Scheme identifying plain syslog.
pub const PLAIN_SCHEME: &str = "syslog";

/// Parsed destination address: scheme, host and optional port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DestinationDescriptor {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl DestinationDescriptor {
    /// Parse `input` as a URL-like destination.
    pub fn parse(input: &str) -> Result<Self, SyslogWriterError> {
        let url = Url::parse(input).map_err(|err| SyslogWriterError::InvalidDestination {
            url: input.to_owned(),
            reason: err.to_string(),
        })?;
        Self::from_url(&url)
    }

    /// Build a descriptor from an already parsed URL.
    pub fn from_url(url: &Url) -> Result<Self, SyslogWriterError> {
        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_owned(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => {
                return Err(SyslogWriterError::InvalidDestination {
                    url: url.to_string(),
                    reason: "missing host".into(),
                });
            }
        };
        Ok(Self {
            scheme: url.scheme().to_owned(),
            host,
            port: url.port(),
        })
    }

    /// URL scheme, lower-cased.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or IP literal, without IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, if the descriptor carried one.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Port to dial, falling back to `default` when none was given.
    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }
}

impl FromStr for DestinationDescriptor {
    type Err = SyslogWriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DestinationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(addr)) => write!(f, "[{addr}]")?,
            _ => f.write_str(&self.host)?,
        }
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// Confirm that `destination` uses the `expected` scheme.
///
/// This is a plain string comparison; it rejects both the unencrypted syslog
/// scheme and unrelated secure schemes such as `https`.
pub fn validate_scheme(
    destination: &DestinationDescriptor,
    expected: &'static str,
) -> Result<(), SyslogWriterError> {
    if destination.scheme() == expected {
        Ok(())
    } else {
        Err(SyslogWriterError::InvalidScheme {
            scheme: destination.scheme().to_owned(),
            expected,
        })
    }
}
