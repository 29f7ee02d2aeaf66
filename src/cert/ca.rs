use super::{
    error::TlsError,
    pem::{
        decode_certificate_pem, decode_private_key_pem, encode_certificate_pem,
        encode_private_key_pem,
    },
    tls::{new_private_key, new_self_signed_ca},
    types::CertConfig,
};
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;
use std::{fs, path::Path};

pub const CA_COMMON_NAME: &str = "kube-ca";
pub const CA_ORGANIZATION: &str = "bootkube";

/// The cluster CA: a certificate paired with the key that signs with it.
pub struct CertificateAuthority {
    cert: X509,
    key: PKey<Private>,
}

impl CertificateAuthority {
    /// Generates a new key and a self-signed `kube-ca` certificate.
    pub fn generate() -> Result<Self, TlsError> {
        let key = new_private_key(CA_COMMON_NAME)?;
        let config = CertConfig::new(CA_COMMON_NAME, &[CA_ORGANIZATION]);
        let cert = new_self_signed_ca(&config, &key)?;
        Ok(Self { cert, key })
    }

    /// Wraps existing material after checking the key belongs to the certificate.
    pub fn from_parts(cert: X509, key: PKey<Private>) -> Result<Self, TlsError> {
        let cert_key = cert.public_key().map_err(|source| TlsError::Decoding {
            what: "CA public key",
            source,
        })?;
        if !cert_key.public_eq(&key) {
            return Err(TlsError::InputValidation(
                "CA private key does not match the CA certificate".to_string(),
            ));
        }
        Ok(Self { cert, key })
    }

    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, TlsError> {
        Self::from_parts(decode_certificate_pem(cert_pem)?, decode_private_key_pem(key_pem)?)
    }

    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self, TlsError> {
        let read = |path: &Path| {
            fs::read(path).map_err(|e| {
                TlsError::InputValidation(format!("failed to read {}: {}", path.display(), e))
            })
        };
        Self::from_pem(&read(cert_path)?, &read(key_path)?)
    }

    pub fn cert(&self) -> &X509 {
        &self.cert
    }

    pub fn key(&self) -> &PKey<Private> {
        &self.key
    }

    pub fn cert_pem(&self) -> Result<Vec<u8>, TlsError> {
        encode_certificate_pem(&self.cert)
    }

    pub fn key_pem(&self) -> Result<Vec<u8>, TlsError> {
        encode_private_key_pem(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::inspect::inspect_certificate;
    use tempfile::TempDir;

    #[test]
    fn generated_ca_has_bootstrap_identity() {
        let ca = CertificateAuthority::generate().unwrap();
        let info = inspect_certificate(&ca.cert_pem().unwrap()).unwrap();
        assert!(info.is_ca);
        assert!(info.subject.contains("CN=kube-ca"));
        assert!(info.subject.contains("O=bootkube"));
        assert!(ca.cert().verify(ca.key()).unwrap());
    }

    #[test]
    fn load_round_trips_through_files() {
        let ca = CertificateAuthority::generate().unwrap();
        let dir = TempDir::new().unwrap();
        let cert_path = dir.path().join("ca.crt");
        let key_path = dir.path().join("ca.key");
        fs::write(&cert_path, ca.cert_pem().unwrap()).unwrap();
        fs::write(&key_path, ca.key_pem().unwrap()).unwrap();

        let loaded = CertificateAuthority::load(&cert_path, &key_path).unwrap();
        assert_eq!(loaded.cert_pem().unwrap(), ca.cert_pem().unwrap());
        assert_eq!(loaded.key_pem().unwrap(), ca.key_pem().unwrap());
    }

    #[test]
    fn mismatched_key_is_rejected() {
        let ca = CertificateAuthority::generate().unwrap();
        let other = new_private_key("other").unwrap();
        let err = CertificateAuthority::from_parts(ca.cert().clone(), other)
            .err()
            .unwrap();
        assert!(matches!(err, TlsError::InputValidation(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let result =
            CertificateAuthority::load(&dir.path().join("nope.crt"), &dir.path().join("nope.key"));
        assert!(matches!(result, Err(TlsError::InputValidation(_))));
    }
}
