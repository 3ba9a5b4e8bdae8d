//! Dialling and TLS negotiation for the TLS writer.

use std::{
    io::{self, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use native_tls::{HandshakeError, TlsConnector, TlsStream};
use sha2::{Digest, Sha256};

use crate::error::SyslogWriterError;

use super::config::{TlsOptions, TrustPolicy, WriterConfig};

impl TlsOptions {
    fn connector(&self) -> io::Result<TlsConnector> {
        let mut builder = TlsConnector::builder();
        for root in &self.extra_roots {
            builder.add_root_certificate(root.clone());
        }
        if self.trust != TrustPolicy::Verify {
            builder.danger_accept_invalid_certs(true);
            builder.danger_accept_invalid_hostnames(true);
        }
        builder.build().map_err(io::Error::other)
    }

    /// Enforce a fingerprint pin once the handshake has completed.
    fn check_pin(&self, stream: &TlsStream<TcpStream>) -> io::Result<()> {
        let TrustPolicy::PinSha256(expected) = &self.trust else {
            return Ok(());
        };
        let certificate = stream
            .peer_certificate()
            .map_err(io::Error::other)?
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "peer presented no certificate")
            })?;
        let der = certificate.to_der().map_err(io::Error::other)?;
        let actual = Sha256::digest(&der);
        if actual.as_slice() == expected.as_slice() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "peer certificate sha256 {} does not match the pinned fingerprint",
                    hex::encode(actual)
                ),
            ))
        }
    }
}

/// Live encrypted connection owned by a writer.
pub struct ActiveConnection {
    stream: TlsStream<TcpStream>,
}

impl ActiveConnection {
    /// Write the whole frame, then flush.
    ///
    /// The octet count already promised `frame.len()` bytes, so the frame is
    /// written in full or the call fails.
    pub fn write_frame(&mut self, frame: &[u8]) -> io::Result<usize> {
        self.stream.write_all(frame)?;
        self.stream.flush()?;
        Ok(frame.len())
    }

    /// Send close_notify and drop the stream.
    pub fn shutdown(mut self) -> io::Result<()> {
        self.stream.shutdown()
    }
}

fn socket_addrs(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    (host, port).to_socket_addrs().map(|iter| iter.collect())
}

fn connect_tcp(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in socket_addrs(host, port)? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                stream.set_nonblocking(false)?;
                return Ok(stream);
            }
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{host}:{port} did not resolve to any address"),
        )
    }))
}

/// Dial the destination and complete the TLS handshake.
///
/// Dialling and the handshake are each bounded by `connect_timeout`. Network
/// failures, including a peer that stalls mid-handshake, map to
/// [`SyslogWriterError::Connection`]; certificate or protocol failures map to
/// [`SyslogWriterError::TlsHandshake`].
pub fn connect_tls(config: &WriterConfig) -> Result<ActiveConnection, SyslogWriterError> {
    let address = config.address();
    let connection_err = |source| SyslogWriterError::Connection {
        address: address.clone(),
        source,
    };
    let handshake_err = |source| SyslogWriterError::TlsHandshake {
        address: address.clone(),
        source,
    };

    let stream = connect_tcp(config.destination.host(), config.port(), config.connect_timeout)
        .map_err(connection_err)?;
    stream
        .set_read_timeout(Some(config.connect_timeout))
        .map_err(connection_err)?;
    stream
        .set_write_timeout(Some(config.connect_timeout))
        .map_err(connection_err)?;

    let connector = config.tls.connector().map_err(handshake_err)?;
    let stream = match connector.connect(config.server_name(), stream) {
        Ok(stream) => stream,
        Err(HandshakeError::Failure(err)) => return Err(handshake_err(io::Error::other(err))),
        Err(HandshakeError::WouldBlock(_)) => {
            return Err(connection_err(io::Error::new(
                io::ErrorKind::TimedOut,
                "TLS handshake timed out",
            )));
        }
    };
    config.tls.check_pin(&stream).map_err(handshake_err)?;

    let tcp = stream.get_ref();
    tcp.set_read_timeout(None).map_err(connection_err)?;
    tcp.set_write_timeout(Some(config.write_timeout))
        .map_err(connection_err)?;
    Ok(ActiveConnection { stream })
}
