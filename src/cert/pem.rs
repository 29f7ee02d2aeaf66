// src/cert/pem.rs
use super::error::TlsError;
use openssl::pkey::{HasPublic, PKey, PKeyRef, Private};
use openssl::x509::{X509Ref, X509};

/// PKCS#1 `RSA PRIVATE KEY` block.
pub fn encode_private_key_pem(key: &PKeyRef<Private>) -> Result<Vec<u8>, TlsError> {
    key.rsa()
        .and_then(|rsa| rsa.private_key_to_pem())
        .map_err(|source| TlsError::Encoding {
            what: "private key",
            source,
        })
}

/// PKIX `PUBLIC KEY` block.
pub fn encode_public_key_pem<T: HasPublic>(key: &PKeyRef<T>) -> Result<Vec<u8>, TlsError> {
    key.public_key_to_pem().map_err(|source| TlsError::Encoding {
        what: "public key",
        source,
    })
}

pub fn encode_certificate_pem(cert: &X509Ref) -> Result<Vec<u8>, TlsError> {
    cert.to_pem().map_err(|source| TlsError::Encoding {
        what: "certificate",
        source,
    })
}

pub fn decode_private_key_pem(data: &[u8]) -> Result<PKey<Private>, TlsError> {
    PKey::private_key_from_pem(data).map_err(|source| TlsError::Decoding {
        what: "private key",
        source,
    })
}

pub fn decode_certificate_pem(data: &[u8]) -> Result<X509, TlsError> {
    X509::from_pem(data).map_err(|source| TlsError::Decoding {
        what: "certificate",
        source,
    })
}
