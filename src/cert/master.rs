// src/cert/master.rs
use super::api_server::api_server_config;
use super::ca::CertificateAuthority;
use super::error::TlsError;
use super::kubelet::kubelet_config;
use super::operations::{issue_key_and_cert, key_and_cert_assets};
use super::service_account::ServiceAccountKeys;
use super::types::{AltNames, Asset, AssetName};

/// CA, API server, service account and kubelet material, in that order.
pub fn master_assets(
    ca: &CertificateAuthority,
    api_alt_names: &AltNames,
) -> Result<Vec<Asset>, TlsError> {
    let (api_key, api_cert) = issue_key_and_cert(ca, &api_server_config(api_alt_names))?;
    let service_account = ServiceAccountKeys::generate()?;
    let (kubelet_key, kubelet_cert) = issue_key_and_cert(ca, &kubelet_config())?;

    let mut assets = vec![
        Asset::new(AssetName::CaKey, ca.key_pem()?),
        Asset::new(AssetName::CaCert, ca.cert_pem()?),
    ];
    assets.extend(key_and_cert_assets(
        (AssetName::ApiServerKey, &api_key),
        (AssetName::ApiServerCert, &api_cert),
    )?);
    assets.extend(service_account.into_assets());
    assets.extend(key_and_cert_assets(
        (AssetName::KubeletKey, &kubelet_key),
        (AssetName::KubeletCert, &kubelet_cert),
    )?);
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::api_server::KUBERNETES_SERVICE_DNS_NAMES;
    use crate::cert::inspect::inspect_certificate;
    use crate::cert::pem::decode_certificate_pem;
    use crate::cert::verification::verify_issued_by;

    fn find<'a>(assets: &'a [Asset], name: AssetName) -> &'a Asset {
        assets.iter().find(|a| a.name == name).unwrap()
    }

    #[test]
    fn emits_master_assets_in_order() {
        let ca = CertificateAuthority::generate().unwrap();
        let assets = master_assets(&ca, &AltNames::default()).unwrap();
        let names: Vec<_> = assets.iter().map(|a| a.name).collect();
        assert_eq!(
            names,
            vec![
                AssetName::CaKey,
                AssetName::CaCert,
                AssetName::ApiServerKey,
                AssetName::ApiServerCert,
                AssetName::ServiceAccountPrivKey,
                AssetName::ServiceAccountPubKey,
                AssetName::KubeletKey,
                AssetName::KubeletCert,
            ]
        );
        assert_eq!(find(&assets, AssetName::CaCert).data, ca.cert_pem().unwrap());
        assert_eq!(find(&assets, AssetName::CaKey).data, ca.key_pem().unwrap());
    }

    #[test]
    fn api_server_sans_include_service_names_and_caller_names() {
        let ca = CertificateAuthority::generate().unwrap();
        let caller = AltNames {
            dns_names: vec!["k8s.example.com".to_string()],
            ips: vec!["10.3.0.1".parse().unwrap(), "192.168.1.10".parse().unwrap()],
        };
        let assets = master_assets(&ca, &caller).unwrap();
        let info = inspect_certificate(&find(&assets, AssetName::ApiServerCert).data).unwrap();

        assert!(info.dns_names.contains(&"k8s.example.com".to_string()));
        for name in KUBERNETES_SERVICE_DNS_NAMES {
            assert!(info.dns_names.contains(&name.to_string()), "missing {}", name);
        }
        assert_eq!(info.ip_addresses, vec!["10.3.0.1", "192.168.1.10"]);
        assert!(info.subject.contains("CN=kube-apiserver"));
    }

    #[test]
    fn api_server_sans_present_without_caller_names() {
        let ca = CertificateAuthority::generate().unwrap();
        let assets = master_assets(&ca, &AltNames::default()).unwrap();
        let info = inspect_certificate(&find(&assets, AssetName::ApiServerCert).data).unwrap();
        assert_eq!(info.dns_names, KUBERNETES_SERVICE_DNS_NAMES.to_vec());
        assert!(info.ip_addresses.is_empty());
    }

    #[test]
    fn kubelet_is_in_masters_group() {
        let ca = CertificateAuthority::generate().unwrap();
        let assets = master_assets(&ca, &AltNames::default()).unwrap();
        let info = inspect_certificate(&find(&assets, AssetName::KubeletCert).data).unwrap();
        assert!(info.subject.contains("CN=kubelet"));
        assert!(info.subject.contains("O=system:masters"));
        assert!(info.dns_names.is_empty());
    }

    #[test]
    fn leaves_chain_to_the_ca() {
        let ca = CertificateAuthority::generate().unwrap();
        let assets = master_assets(&ca, &AltNames::default()).unwrap();
        for name in [AssetName::ApiServerCert, AssetName::KubeletCert] {
            let cert = decode_certificate_pem(&find(&assets, name).data).unwrap();
            assert!(verify_issued_by(&cert, ca.cert()).unwrap(), "{} does not verify", name);
        }
    }
}
