// src/cert/etcd.rs
use super::altnames::resolve_urls;
use super::ca::CertificateAuthority;
use super::error::TlsError;
use super::operations::{issue_key_and_cert, key_and_cert_assets};
use super::pem::{
    decode_certificate_pem, decode_private_key_pem, encode_certificate_pem,
    encode_private_key_pem,
};
use super::types::{AltNames, Asset, AssetName, CertConfig};
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;
use std::net::{IpAddr, Ipv4Addr};
use std::{fs, path::Path};
use url::Url;

pub const ETCD_ORGANIZATION: &str = "etcd";
pub const ETCD_SERVER_COMMON_NAME: &str = "etcd-server";
pub const ETCD_PEER_COMMON_NAME: &str = "etcd-peer";
pub const ETCD_CLIENT_COMMON_NAME: &str = "etcd-client";

/// In-cluster names of the self-hosted etcd members and their client service.
pub const SELF_HOSTED_ETCD_DNS_NAMES: [&str; 2] = [
    "*.kube-etcd.kube-system.svc.cluster.local",
    "kube-etcd-client.kube-system.svc.cluster.local",
];

/// Material for an etcd cluster that runs its own CA. Always supplied as a
/// set: the CA plus the client credentials issued by it.
pub struct ExternalEtcdMaterial {
    pub ca_cert: X509,
    pub client_cert: X509,
    pub client_key: PKey<Private>,
}

impl ExternalEtcdMaterial {
    pub fn load(
        ca_path: &Path,
        client_cert_path: &Path,
        client_key_path: &Path,
    ) -> Result<Self, TlsError> {
        let read = |path: &Path| {
            fs::read(path).map_err(|e| {
                TlsError::InputValidation(format!("failed to read {}: {}", path.display(), e))
            })
        };
        Ok(Self {
            ca_cert: decode_certificate_pem(&read(ca_path)?)?,
            client_cert: decode_certificate_pem(&read(client_cert_path)?)?,
            client_key: decode_private_key_pem(&read(client_key_path)?)?,
        })
    }
}

fn etcd_config(common_name: &str, alt_names: AltNames) -> CertConfig {
    CertConfig::new(common_name, &[ETCD_ORGANIZATION]).with_alt_names(alt_names)
}

/// Assets for an etcd cluster managed outside the control plane.
///
/// Without existing material the master CA doubles as the etcd CA and a
/// client and a peer certificate are issued for the configured servers.
/// Existing material is passed through as-is and no peer pair is produced.
pub fn external_etcd_assets(
    existing: Option<&ExternalEtcdMaterial>,
    ca: &CertificateAuthority,
    servers: &[Url],
) -> Result<Vec<Asset>, TlsError> {
    let Some(existing) = existing else {
        let alt_names = resolve_urls(servers);
        let (client_key, client_cert) =
            issue_key_and_cert(ca, &etcd_config(ETCD_CLIENT_COMMON_NAME, alt_names.clone()))?;
        // Peer pair is not consumed by any self-hosted component.
        let (peer_key, peer_cert) =
            issue_key_and_cert(ca, &etcd_config(ETCD_PEER_COMMON_NAME, alt_names))?;

        let mut assets = Vec::with_capacity(5);
        assets.extend(key_and_cert_assets(
            (AssetName::EtcdPeerKey, &peer_key),
            (AssetName::EtcdPeerCert, &peer_cert),
        )?);
        assets.push(Asset::new(AssetName::EtcdCa, ca.cert_pem()?));
        assets.extend(key_and_cert_assets(
            (AssetName::EtcdClientKey, &client_key),
            (AssetName::EtcdClientCert, &client_cert),
        )?);
        return Ok(assets);
    };

    Ok(vec![
        Asset::new(AssetName::EtcdCa, encode_certificate_pem(&existing.ca_cert)?),
        Asset::new(AssetName::EtcdClientKey, encode_private_key_pem(&existing.client_key)?),
        Asset::new(AssetName::EtcdClientCert, encode_certificate_pem(&existing.client_cert)?),
    ])
}

/// Server, peer and client certificates for etcd running inside the cluster,
/// all signed by the master CA. User supplied etcd certs are never used here.
pub fn self_hosted_etcd_assets(
    etcd_service_ip: IpAddr,
    bootstrap_etcd_service_ip: IpAddr,
    ca: &CertificateAuthority,
) -> Result<Vec<Asset>, TlsError> {
    let internal_names = || SELF_HOSTED_ETCD_DNS_NAMES.iter().map(|n| n.to_string());

    let server_names = AltNames {
        dns_names: std::iter::once("localhost".to_string())
            .chain(internal_names())
            .collect(),
        ips: vec![
            etcd_service_ip,
            bootstrap_etcd_service_ip,
            IpAddr::V4(Ipv4Addr::LOCALHOST),
        ],
    };
    let peer_names = AltNames {
        dns_names: internal_names().collect(),
        ips: vec![bootstrap_etcd_service_ip],
    };

    let (server_key, server_cert) =
        issue_key_and_cert(ca, &etcd_config(ETCD_SERVER_COMMON_NAME, server_names))?;
    let (peer_key, peer_cert) =
        issue_key_and_cert(ca, &etcd_config(ETCD_PEER_COMMON_NAME, peer_names))?;
    let (client_key, client_cert) =
        issue_key_and_cert(ca, &etcd_config(ETCD_CLIENT_COMMON_NAME, AltNames::default()))?;

    let mut assets = Vec::with_capacity(7);
    assets.extend(key_and_cert_assets(
        (AssetName::EtcdServerKey, &server_key),
        (AssetName::EtcdServerCert, &server_cert),
    )?);
    assets.extend(key_and_cert_assets(
        (AssetName::EtcdPeerKey, &peer_key),
        (AssetName::EtcdPeerCert, &peer_cert),
    )?);
    assets.extend(key_and_cert_assets(
        (AssetName::EtcdClientKey, &client_key),
        (AssetName::EtcdClientCert, &client_cert),
    )?);
    assets.push(Asset::new(AssetName::EtcdCa, ca.cert_pem()?));
    Ok(assets)
}
