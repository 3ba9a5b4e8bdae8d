//! Throwaway PKI for TLS tests.
//!
//! Mints a self-signed certificate authority and a `localhost` leaf it signs.
//! Nothing here is meant for production trust material.

use native_tls::Identity;
use once_cell::sync::Lazy;
use openssl::{
    asn1::Asn1Time,
    bn::BigNum,
    hash::MessageDigest,
    pkey::{PKey, Private},
    rsa::Rsa,
    x509::{
        X509, X509Builder, X509NameBuilder,
        extension::{
            AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage,
            SubjectAlternativeName, SubjectKeyIdentifier,
        },
    },
};
use sha2::{Digest, Sha256};

/// Certificate material shared by the TLS tests.
pub struct TestPki {
    /// PEM encoded CA certificate, suitable for a trust bundle.
    pub ca_pem: Vec<u8>,
    /// PEM encoded CA that signed nothing the server presents.
    pub unrelated_ca_pem: Vec<u8>,
    /// Leaf certificate and key presented by the test server.
    pub identity: Identity,
    /// SHA-256 digest of the DER encoded leaf certificate.
    pub leaf_sha256: [u8; 32],
}

/// Process-wide PKI; key generation is slow enough to share.
pub static PKI: Lazy<TestPki> = Lazy::new(generate);

fn new_key() -> PKey<Private> {
    let rsa = Rsa::generate(2048).expect("generate RSA key");
    PKey::from_rsa(rsa).expect("wrap RSA key")
}

fn name(common_name: &str) -> openssl::x509::X509Name {
    let mut builder = X509NameBuilder::new().expect("name builder");
    builder
        .append_entry_by_text("CN", common_name)
        .expect("set common name");
    builder.build()
}

fn base_builder(serial: u32, subject: &str, key: &PKey<Private>) -> X509Builder {
    let mut builder = X509Builder::new().expect("x509 builder");
    builder.set_version(2).expect("set version");
    let serial = BigNum::from_u32(serial)
        .and_then(|bn| bn.to_asn1_integer())
        .expect("serial number");
    builder.set_serial_number(&serial).expect("set serial");
    builder.set_subject_name(&name(subject)).expect("set subject");
    builder.set_pubkey(key).expect("set public key");
    let not_before = Asn1Time::days_from_now(0).expect("not before");
    let not_after = Asn1Time::days_from_now(2).expect("not after");
    builder.set_not_before(&not_before).expect("set not before");
    builder.set_not_after(&not_after).expect("set not after");
    builder
}

fn self_signed_ca(common_name: &str) -> (X509, PKey<Private>) {
    let key = new_key();
    let mut ca = base_builder(1, common_name, &key);
    ca.set_issuer_name(&name(common_name))
        .expect("set CA issuer");
    ca.append_extension(BasicConstraints::new().critical().ca().build().unwrap())
        .unwrap();
    ca.append_extension(
        KeyUsage::new()
            .critical()
            .key_cert_sign()
            .crl_sign()
            .build()
            .unwrap(),
    )
    .unwrap();
    let ski = SubjectKeyIdentifier::new()
        .build(&ca.x509v3_context(None, None))
        .unwrap();
    ca.append_extension(ski).unwrap();
    ca.sign(&key, MessageDigest::sha256()).expect("sign CA");
    (ca.build(), key)
}

fn generate() -> TestPki {
    let (ca, ca_key) = self_signed_ca("syslogwriter test CA");
    let (unrelated_ca, _) = self_signed_ca("unrelated test CA");

    let leaf_key = new_key();
    let mut leaf = base_builder(2, "localhost", &leaf_key);
    leaf.set_issuer_name(ca.subject_name())
        .expect("set leaf issuer");
    leaf.append_extension(BasicConstraints::new().build().unwrap())
        .unwrap();
    leaf.append_extension(
        KeyUsage::new()
            .critical()
            .digital_signature()
            .key_encipherment()
            .build()
            .unwrap(),
    )
    .unwrap();
    leaf.append_extension(ExtendedKeyUsage::new().server_auth().build().unwrap())
        .unwrap();
    let san = SubjectAlternativeName::new()
        .dns("localhost")
        .ip("127.0.0.1")
        .build(&leaf.x509v3_context(Some(&ca), None))
        .unwrap();
    leaf.append_extension(san).unwrap();
    let aki = AuthorityKeyIdentifier::new()
        .keyid(false)
        .build(&leaf.x509v3_context(Some(&ca), None))
        .unwrap();
    leaf.append_extension(aki).unwrap();
    leaf.sign(&ca_key, MessageDigest::sha256())
        .expect("sign leaf");
    let leaf: X509 = leaf.build();

    let leaf_pem = leaf.to_pem().expect("leaf pem");
    let key_pem = leaf_key
        .private_key_to_pem_pkcs8()
        .expect("leaf key pem");
    let identity = Identity::from_pkcs8(&leaf_pem, &key_pem).expect("server identity");
    let leaf_der = leaf.to_der().expect("leaf der");

    TestPki {
        ca_pem: ca.to_pem().expect("CA pem"),
        unrelated_ca_pem: unrelated_ca.to_pem().expect("unrelated CA pem"),
        identity,
        leaf_sha256: Sha256::digest(&leaf_der).into(),
    }
}
