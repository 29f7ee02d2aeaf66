// src/cert/service_account.rs
use super::error::TlsError;
use super::pem::{encode_private_key_pem, encode_public_key_pem};
use super::tls::new_private_key;
use super::types::{Asset, AssetName};

/// Signing keypair for service account tokens. Only the raw keys are emitted;
/// there is no certificate.
pub struct ServiceAccountKeys {
    private_pem: Vec<u8>,
    public_pem: Vec<u8>,
}

impl ServiceAccountKeys {
    pub fn generate() -> Result<Self, TlsError> {
        let key = new_private_key("service-account")?;
        Ok(Self {
            private_pem: encode_private_key_pem(&key)?,
            public_pem: encode_public_key_pem(&key)?,
        })
    }

    pub fn into_assets(self) -> [Asset; 2] {
        [
            Asset::new(AssetName::ServiceAccountPrivKey, self.private_pem),
            Asset::new(AssetName::ServiceAccountPubKey, self.public_pem),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::pem::decode_private_key_pem;
    use openssl::pkey::PKey;

    #[test]
    fn public_key_matches_private_key() {
        let [private, public] = ServiceAccountKeys::generate().unwrap().into_assets();
        assert_eq!(private.name, AssetName::ServiceAccountPrivKey);
        assert_eq!(public.name, AssetName::ServiceAccountPubKey);

        let private_key = decode_private_key_pem(&private.data).unwrap();
        let public_key = PKey::public_key_from_pem(&public.data).unwrap();
        assert!(public_key.public_eq(&private_key));
    }
}
