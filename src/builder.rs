//! Builder for [`TlsSyslogWriter`](crate::tls_writer::TlsSyslogWriter).
//!
//! Exposes the destination, trust configuration, header overrides, timeouts
//! and the frame size limit. [`TlsWriterSettings`] offers the same surface
//! as a serde document so deployments can keep writer settings in a config
//! file.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use native_tls::Certificate;
use serde::Deserialize;

use crate::{
    destination::DestinationDescriptor,
    error::BuildError,
    tls_writer::{TlsSyslogWriter, TrustPolicy, WriterConfig},
};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(BuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`TlsSyslogWriter`] instances.
#[derive(Clone, Debug, Default)]
pub struct TlsWriterBuilder {
    destination: Option<String>,
    app_id: Option<String>,
    trust: TrustPolicy,
    trust_bundle: Option<PathBuf>,
    server_name: Option<String>,
    hostname: Option<String>,
    connect_timeout_ms: Option<u64>,
    write_timeout_ms: Option<u64>,
    max_frame_size: Option<usize>,
}

impl TlsWriterBuilder {
    /// Create a new builder with no destination configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the destination URL, e.g. `syslog-tls://logs.example.com:6514`.
    pub fn with_destination(mut self, url: impl Into<String>) -> Self {
        self.destination = Some(url.into());
        self
    }

    /// Set the application identifier written as APP-NAME.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Choose how the peer certificate is trusted. Defaults to
    /// [`TrustPolicy::Verify`].
    pub fn with_trust(mut self, trust: TrustPolicy) -> Self {
        self.trust = trust;
        self
    }

    /// Disable certificate chain and hostname checks.
    pub fn insecure_skip_verify(self) -> Self {
        self.with_trust(TrustPolicy::SkipVerify)
    }

    /// Trust the certificates in a PEM bundle in addition to the system store.
    pub fn with_trust_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.trust_bundle = Some(path.into());
        self
    }

    /// Override the name used for SNI and hostname verification.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    /// Override the HOSTNAME header, which defaults to the local hostname.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    option_setter!(
        #[doc = "Set the dial and handshake timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the socket write timeout in milliseconds."]
        with_write_timeout_ms,
        write_timeout_ms,
        u64
    );
    option_setter!(with_max_frame_size, max_frame_size, usize);

    fn validate(&self) -> Result<(), BuildError> {
        self.validate_required()?;
        self.validate_server_name()?;
        self.validate_limits()?;
        Ok(())
    }

    fn validate_required(&self) -> Result<(), BuildError> {
        match (&self.destination, &self.app_id) {
            (None, _) => Err(BuildError::InvalidConfig(
                "syslog writer requires a destination".into(),
            )),
            (Some(url), _) if url.trim().is_empty() => Err(BuildError::InvalidConfig(
                "destination must not be empty".into(),
            )),
            (_, None) => Err(BuildError::InvalidConfig(
                "syslog writer requires an app_id".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_server_name(&self) -> Result<(), BuildError> {
        match &self.server_name {
            Some(name) if name.trim().is_empty() => Err(BuildError::InvalidConfig(
                "server_name must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_limits(&self) -> Result<(), BuildError> {
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        if let Some(timeout) = self.write_timeout_ms {
            ensure_positive!(timeout, "write_timeout_ms")?;
        }
        if let Some(size) = self.max_frame_size {
            ensure_positive!(size, "max_frame_size")?;
        }
        Ok(())
    }

    fn build_config(&self) -> Result<WriterConfig, BuildError> {
        self.validate()?;
        let url = self.destination.as_deref().unwrap_or_default();
        let destination = DestinationDescriptor::parse(url.trim())?;
        let mut config = WriterConfig::new(destination, self.app_id.clone().unwrap_or_default())
            .with_trust(self.trust.clone());
        self.apply_optional_fields(&mut config);
        if let Some(path) = &self.trust_bundle {
            config.tls.extra_roots = load_trust_bundle(path)?;
        }
        Ok(config)
    }

    fn apply_optional_fields(&self, config: &mut WriterConfig) {
        if let Some(hostname) = &self.hostname {
            config.hostname = hostname.clone();
        }
        if let Some(name) = &self.server_name {
            config.tls.server_name = Some(name.trim().to_owned());
        }
        if let Some(timeout) = self.connect_timeout_ms {
            config.connect_timeout = Duration::from_millis(timeout);
        }
        if let Some(timeout) = self.write_timeout_ms {
            config.write_timeout = Duration::from_millis(timeout);
        }
        if let Some(size) = self.max_frame_size {
            config.max_frame_size = size;
        }
    }

    /// Validate the configuration and construct the writer.
    ///
    /// No connection is opened; call
    /// [`TlsSyslogWriter::connect`] afterwards.
    pub fn build(&self) -> Result<TlsSyslogWriter, BuildError> {
        let config = self.build_config()?;
        Ok(TlsSyslogWriter::with_config(config)?)
    }
}

/// Read every certificate from a PEM bundle.
fn load_trust_bundle(path: &Path) -> Result<Vec<Certificate>, BuildError> {
    let bundle_err = |source| BuildError::TrustBundle {
        path: path.to_path_buf(),
        source,
    };
    let pem = fs::read(path).map_err(bundle_err)?;
    let certificates = Certificate::stack_from_pem(&pem)
        .map_err(|err| bundle_err(io::Error::new(io::ErrorKind::InvalidData, err)))?;
    if certificates.is_empty() {
        return Err(bundle_err(io::Error::new(
            io::ErrorKind::InvalidData,
            "no certificates found",
        )));
    }
    Ok(certificates)
}

/// Writer settings as they appear in a configuration document.
///
/// ```json
/// {
///   "url": "syslog-tls://logs.example.com:6514",
///   "app_id": "billing",
///   "trust": "verify",
///   "trust_bundle": "/etc/ssl/collector-ca.pem",
///   "connect_timeout_ms": 2000
/// }
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TlsWriterSettings {
    pub url: String,
    pub app_id: String,
    /// `verify`, `skip-verify` or `sha256:<hex digest>`.
    pub trust: Option<String>,
    pub trust_bundle: Option<PathBuf>,
    pub server_name: Option<String>,
    pub hostname: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub write_timeout_ms: Option<u64>,
    pub max_frame_size: Option<usize>,
}

impl TlsWriterSettings {
    /// Convert the settings into a builder.
    pub fn into_builder(self) -> Result<TlsWriterBuilder, BuildError> {
        let trust = match self.trust.as_deref() {
            Some(raw) => raw
                .parse::<TrustPolicy>()
                .map_err(|err| BuildError::InvalidConfig(err.to_string()))?,
            None => TrustPolicy::default(),
        };
        Ok(TlsWriterBuilder {
            destination: Some(self.url),
            app_id: Some(self.app_id),
            trust,
            trust_bundle: self.trust_bundle,
            server_name: self.server_name,
            hostname: self.hostname,
            connect_timeout_ms: self.connect_timeout_ms,
            write_timeout_ms: self.write_timeout_ms,
            max_frame_size: self.max_frame_size,
        })
    }
}
