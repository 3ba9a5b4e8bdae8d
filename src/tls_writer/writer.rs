//! Public writer type exported by the crate.

use log::debug;
use parking_lot::Mutex;

use crate::{
    destination::{DestinationDescriptor, TLS_SCHEME, validate_scheme},
    error::SyslogWriterError,
    formatter::{Rfc5424Formatter, encode_frame},
    log_record::SyslogRecord,
    writer::SyslogWriter,
};

use super::{
    config::{TrustPolicy, WriterConfig},
    transport::{ActiveConnection, connect_tls},
};

/// Writer delivering RFC 5424 frames to one collector over TLS.
///
/// Reconnecting while a connection is open is refused with
/// [`SyslogWriterError::AlreadyConnected`]; call [`close`](Self::close) first.
pub struct TlsSyslogWriter {
    config: WriterConfig,
    formatter: Rfc5424Formatter,
    connection: Mutex<Option<ActiveConnection>>,
}

impl TlsSyslogWriter {
    /// Construct a writer for `destination` with default settings.
    ///
    /// Fails with [`SyslogWriterError::InvalidScheme`] unless the destination
    /// uses `syslog-tls`. No network I/O happens here.
    pub fn new(
        destination: &DestinationDescriptor,
        app_id: &str,
        trust: TrustPolicy,
    ) -> Result<Self, SyslogWriterError> {
        Self::with_config(WriterConfig::new(destination.clone(), app_id).with_trust(trust))
    }

    /// Construct the writer from a configuration object.
    pub fn with_config(config: WriterConfig) -> Result<Self, SyslogWriterError> {
        validate_scheme(&config.destination, TLS_SCHEME)?;
        let formatter = Rfc5424Formatter::new(&config.hostname, &config.app_id);
        Ok(Self {
            config,
            formatter,
            connection: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Formatter used to build each frame.
    pub fn formatter(&self) -> &Rfc5424Formatter {
        &self.formatter
    }

    /// Open the TLS connection.
    pub fn connect(&self) -> Result<(), SyslogWriterError> {
        let mut connection = self.connection.lock();
        if connection.is_some() {
            return Err(SyslogWriterError::AlreadyConnected {
                address: self.config.address(),
            });
        }
        *connection = Some(connect_tls(&self.config)?);
        debug!("TlsSyslogWriter connected to {}", self.config.address());
        Ok(())
    }

    /// Send `record` as one octet-counted frame.
    pub fn write(&self, record: &SyslogRecord) -> Result<usize, SyslogWriterError> {
        let mut connection = self.connection.lock();
        let Some(active) = connection.as_mut() else {
            return Err(SyslogWriterError::NotConnected);
        };
        let frame = encode_frame(&self.formatter, record, self.config.max_frame_size)?;
        active
            .write_frame(&frame)
            .map_err(|source| SyslogWriterError::Write {
                address: self.config.address(),
                source,
            })
    }

    /// Close the connection if one is open.
    pub fn close(&self) {
        let Some(active) = self.connection.lock().take() else {
            return;
        };
        if let Err(err) = active.shutdown() {
            debug!(
                "TlsSyslogWriter: TLS shutdown with {} failed: {err}",
                self.config.address()
            );
        }
        debug!("TlsSyslogWriter closed connection to {}", self.config.address());
    }

    pub fn is_connected(&self) -> bool {
        self.connection.lock().is_some()
    }
}

impl SyslogWriter for TlsSyslogWriter {
    fn connect(&self) -> Result<(), SyslogWriterError> {
        TlsSyslogWriter::connect(self)
    }

    fn write(&self, record: &SyslogRecord) -> Result<usize, SyslogWriterError> {
        TlsSyslogWriter::write(self, record)
    }

    fn close(&self) {
        TlsSyslogWriter::close(self);
    }

    fn is_connected(&self) -> bool {
        TlsSyslogWriter::is_connected(self)
    }
}

impl Drop for TlsSyslogWriter {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for TlsSyslogWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsSyslogWriter")
            .field("destination", &self.config.destination.to_string())
            .field("app_id", &self.config.app_id)
            .field("connected", &self.is_connected())
            .finish()
    }
}
