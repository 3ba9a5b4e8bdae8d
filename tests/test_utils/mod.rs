//! Shared helpers for the integration tests: a throwaway PKI and a TLS
//! collector that records every byte it receives.

// Each test binary uses only part of these helpers.
#![allow(dead_code)]

pub mod certs;
pub mod tls_server;

pub use certs::PKI;
pub use tls_server::TlsCollector;
