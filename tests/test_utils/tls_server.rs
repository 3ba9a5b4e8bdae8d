//! In-process TLS syslog collector.
//!
//! Accepts connections on an ephemeral loopback port, completes the TLS
//! handshake with the test PKI identity and hands each connection's bytes to
//! the test once the peer closes it.

use std::{
    io::Read,
    net::TcpListener,
    sync::mpsc::{self, Receiver},
    thread,
    time::Duration,
};

use native_tls::TlsAcceptor;

use super::certs::PKI;

/// Handle to a running collector.
pub struct TlsCollector {
    port: u16,
    connections: Receiver<Vec<u8>>,
    handshake_failures: Receiver<String>,
}

impl TlsCollector {
    /// Bind to `127.0.0.1:0` and start accepting in a background thread.
    pub fn start() -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind collector");
        let port = listener.local_addr().expect("collector address").port();
        let acceptor = TlsAcceptor::new(PKI.identity.clone()).expect("build acceptor");
        let (conn_tx, conn_rx) = mpsc::channel();
        let (fail_tx, fail_rx) = mpsc::channel();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let acceptor = acceptor.clone();
                let conn_tx = conn_tx.clone();
                let fail_tx = fail_tx.clone();
                thread::spawn(move || match acceptor.accept(stream) {
                    Ok(mut tls) => {
                        let mut received = Vec::new();
                        // A reset after close_notify still leaves the data read so far.
                        let _ = tls.read_to_end(&mut received);
                        let _ = conn_tx.send(received);
                    }
                    Err(err) => {
                        let _ = fail_tx.send(err.to_string());
                    }
                });
            }
        });
        Self {
            port,
            connections: conn_rx,
            handshake_failures: fail_rx,
        }
    }

    /// Destination URL that resolves to this collector and matches the leaf
    /// certificate's DNS name.
    pub fn url(&self) -> String {
        format!("syslog-tls://localhost:{}", self.port)
    }

    /// Bytes received on the next connection to finish.
    pub fn recv_connection(&self) -> Vec<u8> {
        self.connections
            .recv_timeout(Duration::from_secs(10))
            .expect("collector should receive a connection")
    }

    /// Error text from the next handshake the server side rejected.
    pub fn recv_handshake_failure(&self) -> Option<String> {
        self.handshake_failures
            .recv_timeout(Duration::from_secs(5))
            .ok()
    }
}
