//! Configuration structures consumed by the TLS writer.
//!
//! `TlsWriterBuilder` constructs these values before passing them to
//! [`TlsSyslogWriter`](super::TlsSyslogWriter); callers that need no
//! validation can also fill a [`WriterConfig`] directly.

use std::{fmt, net::IpAddr, str::FromStr, time::Duration};

use native_tls::Certificate;
use thiserror::Error;

use crate::{destination::DestinationDescriptor, formatter::NIL};

/// Port used when the destination does not name one (RFC 5425).
pub const DEFAULT_TLS_PORT: u16 = 6514;
/// Default timeout for dialling and for the TLS handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default write timeout applied to the socket once connected.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(1);
/// Default upper bound on the size of one formatted message.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1 << 20; // 1 MiB

/// How the peer certificate is trusted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TrustPolicy {
    /// Validate the chain against the system store and any extra roots,
    /// including hostname checks.
    #[default]
    Verify,
    /// Skip chain and hostname checks. The handshake itself still runs.
    SkipVerify,
    /// Skip chain checks but require the SHA-256 digest of the peer's leaf
    /// certificate (DER encoded) to match.
    PinSha256([u8; 32]),
}

/// Raised when a trust policy string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid trust policy {0:?}: expected \"verify\", \"skip-verify\" or \"sha256:<hex digest>\"")]
pub struct InvalidTrustPolicy(pub String);

impl FromStr for TrustPolicy {
    type Err = InvalidTrustPolicy;

    /// Accepts `verify`, `skip-verify`, or `sha256:` followed by 64 hex
    /// digits, optionally colon separated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "verify" => return Ok(Self::Verify),
            "skip-verify" | "insecure" => return Ok(Self::SkipVerify),
            _ => {}
        }
        let digest = trimmed
            .strip_prefix("sha256:")
            .ok_or_else(|| InvalidTrustPolicy(s.to_owned()))?
            .replace(':', "");
        let mut pin = [0u8; 32];
        hex::decode_to_slice(&digest, &mut pin).map_err(|_| InvalidTrustPolicy(s.to_owned()))?;
        Ok(Self::PinSha256(pin))
    }
}

/// TLS connection options.
#[derive(Clone, Default)]
pub struct TlsOptions {
    /// Name presented for SNI and hostname checks. Defaults to the
    /// destination host.
    pub server_name: Option<String>,
    pub trust: TrustPolicy,
    /// Roots trusted in addition to the system store.
    pub extra_roots: Vec<Certificate>,
}

impl fmt::Debug for TlsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsOptions")
            .field("server_name", &self.server_name)
            .field("trust", &self.trust)
            .field("extra_roots", &self.extra_roots.len())
            .finish()
    }
}

/// Immutable settings owned by a [`TlsSyslogWriter`](super::TlsSyslogWriter).
#[derive(Clone, Debug)]
pub struct WriterConfig {
    pub destination: DestinationDescriptor,
    /// Written as the APP-NAME of every message.
    pub app_id: String,
    /// Written as the HOSTNAME of every message.
    pub hostname: String,
    pub connect_timeout: Duration,
    pub write_timeout: Duration,
    pub max_frame_size: usize,
    pub tls: TlsOptions,
}

impl WriterConfig {
    /// Configuration with default timeouts, the local hostname and
    /// certificate verification enabled.
    pub fn new(destination: DestinationDescriptor, app_id: impl Into<String>) -> Self {
        Self {
            destination,
            app_id: app_id.into(),
            hostname: local_hostname(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            tls: TlsOptions::default(),
        }
    }

    /// Override the trust policy.
    pub fn with_trust(mut self, trust: TrustPolicy) -> Self {
        self.tls.trust = trust;
        self
    }

    pub fn port(&self) -> u16 {
        self.destination.port_or(DEFAULT_TLS_PORT)
    }

    /// Name used for SNI and certificate hostname checks.
    pub fn server_name(&self) -> &str {
        self.tls
            .server_name
            .as_deref()
            .unwrap_or_else(|| self.destination.host())
    }

    /// `host:port` form used in errors and log lines.
    pub fn address(&self) -> String {
        let host = self.destination.host();
        match host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{host}]:{}", self.port()),
            _ => format!("{host}:{}", self.port()),
        }
    }
}

/// Hostname of the local machine, or the syslog nil value when unknown.
pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| NIL.to_owned())
}
