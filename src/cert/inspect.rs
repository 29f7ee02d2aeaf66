use chrono::{DateTime, TimeZone, Utc};
use openssl::hash::{hash, MessageDigest};
use serde::Serialize;
use std::io;
use x509_parser::extensions::GeneralName;
use x509_parser::prelude::{FromDer, ParsedExtension, X509Certificate};

use super::pem::decode_certificate_pem;

#[derive(Debug, Serialize, Clone)]
pub struct CertificateInfo {
    pub subject: String,
    pub issuer: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub serial: String,
    pub fingerprint: String,
    pub is_ca: bool,
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<String>,
}

pub fn inspect_certificate(cert_pem: &[u8]) -> io::Result<CertificateInfo> {
    let cert_der = decode_certificate_pem(cert_pem)
        .and_then(|cert| {
            cert.to_der().map_err(|source| super::error::TlsError::Encoding {
                what: "certificate",
                source,
            })
        })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let (_remainder, cert) = X509Certificate::from_der(&cert_der)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    let not_before = Utc
        .timestamp_opt(cert.validity().not_before.timestamp(), 0)
        .single()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Invalid not_before timestamp"))?;
    let not_after = Utc
        .timestamp_opt(cert.validity().not_after.timestamp(), 0)
        .single()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Invalid not_after timestamp"))?;

    let mut is_ca = false;
    let mut dns_names = Vec::new();
    let mut ip_addresses = Vec::new();
    for ext in cert.extensions() {
        match ext.parsed_extension() {
            ParsedExtension::BasicConstraints(bc) => is_ca = bc.ca,
            ParsedExtension::SubjectAlternativeName(san) => {
                for name in &san.general_names {
                    match name {
                        GeneralName::DNSName(dns) => dns_names.push(dns.to_string()),
                        GeneralName::IPAddress(raw) => {
                            if let Some(ip) = ip_from_bytes(raw) {
                                ip_addresses.push(ip);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    let fingerprint = hash(MessageDigest::sha256(), &cert_der)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(CertificateInfo {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_before,
        not_after,
        serial: hex::encode(cert.raw_serial()),
        fingerprint: hex::encode(fingerprint),
        is_ca,
        dns_names,
        ip_addresses,
    })
}

fn ip_from_bytes(raw: &[u8]) -> Option<String> {
    if let Ok(octets) = <[u8; 4]>::try_from(raw) {
        return Some(std::net::Ipv4Addr::from(octets).to_string());
    }
    if let Ok(octets) = <[u8; 16]>::try_from(raw) {
        return Some(std::net::Ipv6Addr::from(octets).to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pem_input() {
        let err = inspect_certificate(b"-----BEGIN NOTHING-----").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn decodes_raw_ip_bytes() {
        assert_eq!(ip_from_bytes(&[10, 3, 0, 15]).as_deref(), Some("10.3.0.15"));
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(ip_from_bytes(&v6).as_deref(), Some("::1"));
        assert_eq!(ip_from_bytes(&[1, 2, 3]), None);
    }
}
