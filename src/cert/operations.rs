// src/cert/operations.rs
use super::ca::CertificateAuthority;
use super::error::{AssetError, Suite, TlsError};
use super::etcd::{external_etcd_assets, self_hosted_etcd_assets, ExternalEtcdMaterial};
use super::master::master_assets;
use super::pem::{encode_certificate_pem, encode_private_key_pem};
use super::tls::{new_private_key, new_signed_certificate};
use super::types::{AltNames, Asset, AssetName, CertConfig};
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;
use std::net::IpAddr;
use url::Url;

/// Generates a key for `config.common_name` and signs it with the CA.
pub fn issue_key_and_cert(
    ca: &CertificateAuthority,
    config: &CertConfig,
) -> Result<(PKey<Private>, X509), TlsError> {
    let key = new_private_key(&config.common_name)?;
    let cert = new_signed_certificate(config, &key, ca.cert(), ca.key())?;
    Ok((key, cert))
}

pub fn key_and_cert_assets(
    (key_name, key): (AssetName, &PKey<Private>),
    (cert_name, cert): (AssetName, &X509),
) -> Result<[Asset; 2], TlsError> {
    Ok([
        Asset::new(key_name, encode_private_key_pem(key)?),
        Asset::new(cert_name, encode_certificate_pem(cert)?),
    ])
}

/// How etcd is deployed, which decides the etcd assets that get generated.
pub enum EtcdTopology {
    /// etcd is reached without TLS; no etcd assets.
    Plain,
    External {
        existing: Option<ExternalEtcdMaterial>,
        servers: Vec<Url>,
    },
    SelfHosted {
        etcd_service_ip: IpAddr,
        bootstrap_etcd_service_ip: IpAddr,
    },
}

pub struct AssetRequest {
    /// Generated when absent.
    pub ca: Option<CertificateAuthority>,
    pub api_alt_names: AltNames,
    pub etcd: EtcdTopology,
}

/// Builds every suite the request calls for and concatenates them, master
/// assets first. Any failure aborts the whole run.
pub fn generate_assets(request: AssetRequest) -> Result<Vec<Asset>, AssetError> {
    let ca = match request.ca {
        Some(ca) => ca,
        None => CertificateAuthority::generate().map_err(AssetError::in_suite(Suite::Master))?,
    };

    let master = master_assets(&ca, &request.api_alt_names)
        .map_err(AssetError::in_suite(Suite::Master))?;

    let etcd = match &request.etcd {
        EtcdTopology::Plain => Vec::new(),
        EtcdTopology::External { existing, servers } => {
            external_etcd_assets(existing.as_ref(), &ca, servers)
                .map_err(AssetError::in_suite(Suite::ExternalEtcd))?
        }
        EtcdTopology::SelfHosted {
            etcd_service_ip,
            bootstrap_etcd_service_ip,
        } => self_hosted_etcd_assets(*etcd_service_ip, *bootstrap_etcd_service_ip, &ca)
            .map_err(AssetError::in_suite(Suite::SelfHostedEtcd))?,
    };

    Ok([master, etcd].concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(assets: &[Asset]) -> Vec<AssetName> {
        assets.iter().map(|a| a.name).collect()
    }

    fn assert_unique(assets: &[Asset]) {
        let unique: HashSet<_> = assets.iter().map(|a| a.name).collect();
        assert_eq!(unique.len(), assets.len());
    }

    #[test]
    fn plain_etcd_emits_only_master_assets() {
        let assets = generate_assets(AssetRequest {
            ca: None,
            api_alt_names: AltNames::default(),
            etcd: EtcdTopology::Plain,
        })
        .unwrap();
        assert_eq!(assets.len(), 8);
        assert_eq!(assets[0].name, AssetName::CaKey);
        assert_unique(&assets);
    }

    #[test]
    fn supplied_ca_is_used_for_every_suite() {
        let ca = CertificateAuthority::generate().unwrap();
        let ca_pem = ca.cert_pem().unwrap();
        let assets = generate_assets(AssetRequest {
            ca: Some(ca),
            api_alt_names: AltNames::default(),
            etcd: EtcdTopology::SelfHosted {
                etcd_service_ip: "10.3.0.15".parse().unwrap(),
                bootstrap_etcd_service_ip: "10.3.0.20".parse().unwrap(),
            },
        })
        .unwrap();

        assert_eq!(assets.len(), 15);
        assert_unique(&assets);
        let ca_cert = assets.iter().find(|a| a.name == AssetName::CaCert).unwrap();
        let etcd_ca = assets.iter().find(|a| a.name == AssetName::EtcdCa).unwrap();
        assert_eq!(ca_cert.data, ca_pem);
        assert_eq!(etcd_ca.data, ca_pem);
    }

    #[test]
    fn failing_suite_aborts_with_its_name() {
        use openssl::ec::{EcGroup, EcKey};
        use openssl::nid::Nid;

        let etcd_ca = CertificateAuthority::generate().unwrap();
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        let ec_key = PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap();
        let existing = ExternalEtcdMaterial {
            ca_cert: etcd_ca.cert().clone(),
            client_cert: etcd_ca.cert().clone(),
            client_key: ec_key,
        };

        let result = generate_assets(AssetRequest {
            ca: None,
            api_alt_names: AltNames::default(),
            etcd: EtcdTopology::External {
                existing: Some(existing),
                servers: vec![Url::parse("https://10.0.0.5:2379").unwrap()],
            },
        });

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            AssetError::Suite {
                suite: Suite::ExternalEtcd,
                source: TlsError::Encoding { .. },
            }
        ));
        assert!(err.to_string().contains("external etcd"));
    }

    #[test]
    fn external_etcd_follows_master_assets() {
        let assets = generate_assets(AssetRequest {
            ca: None,
            api_alt_names: AltNames::default(),
            etcd: EtcdTopology::External {
                existing: None,
                servers: vec![Url::parse("https://127.0.0.1:2379").unwrap()],
            },
        })
        .unwrap();

        assert_unique(&assets);
        assert_eq!(
            names(&assets)[8..].to_vec(),
            vec![
                AssetName::EtcdPeerKey,
                AssetName::EtcdPeerCert,
                AssetName::EtcdCa,
                AssetName::EtcdClientKey,
                AssetName::EtcdClientCert,
            ]
        );
    }
}
