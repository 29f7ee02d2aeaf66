// cert/types.rs
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Subject alternative names, split by kind. Order of construction is kept
/// and duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AltNames {
    pub dns_names: Vec<String>,
    pub ips: Vec<IpAddr>,
}

impl AltNames {
    pub fn is_empty(&self) -> bool {
        self.dns_names.is_empty() && self.ips.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertConfig {
    pub common_name: String,
    pub organization: Vec<String>,
    pub alt_names: AltNames,
}

impl CertConfig {
    pub fn new(common_name: &str, organization: &[&str]) -> Self {
        Self {
            common_name: common_name.to_string(),
            organization: organization.iter().map(|o| o.to_string()).collect(),
            alt_names: AltNames::default(),
        }
    }

    pub fn with_alt_names(mut self, alt_names: AltNames) -> Self {
        self.alt_names = alt_names;
        self
    }
}

/// Identifiers for every asset this tool can emit. The relative paths are what
/// the manifests and the on-disk layout key off, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetName {
    CaKey,
    CaCert,
    ApiServerKey,
    ApiServerCert,
    ServiceAccountPrivKey,
    ServiceAccountPubKey,
    KubeletKey,
    KubeletCert,
    EtcdCa,
    EtcdClientKey,
    EtcdClientCert,
    EtcdServerKey,
    EtcdServerCert,
    EtcdPeerKey,
    EtcdPeerCert,
}

impl AssetName {
    pub fn path(&self) -> &'static str {
        match self {
            AssetName::CaKey => "tls/ca.key",
            AssetName::CaCert => "tls/ca.crt",
            AssetName::ApiServerKey => "tls/apiserver.key",
            AssetName::ApiServerCert => "tls/apiserver.crt",
            AssetName::ServiceAccountPrivKey => "tls/service-account.key",
            AssetName::ServiceAccountPubKey => "tls/service-account.pub",
            AssetName::KubeletKey => "tls/kubelet.key",
            AssetName::KubeletCert => "tls/kubelet.crt",
            AssetName::EtcdCa => "tls/etcd-ca.crt",
            AssetName::EtcdClientKey => "tls/etcd-client.key",
            AssetName::EtcdClientCert => "tls/etcd-client.crt",
            AssetName::EtcdServerKey => "tls/etcd/server.key",
            AssetName::EtcdServerCert => "tls/etcd/server.crt",
            AssetName::EtcdPeerKey => "tls/etcd/peer.key",
            AssetName::EtcdPeerCert => "tls/etcd/peer.crt",
        }
    }

    /// Private key material, written with owner-only permissions.
    pub fn is_private_key(&self) -> bool {
        matches!(
            self,
            AssetName::CaKey
                | AssetName::ApiServerKey
                | AssetName::ServiceAccountPrivKey
                | AssetName::KubeletKey
                | AssetName::EtcdClientKey
                | AssetName::EtcdServerKey
                | AssetName::EtcdPeerKey
        )
    }

    pub fn is_certificate(&self) -> bool {
        self.path().ends_with(".crt")
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: AssetName,
    pub data: Vec<u8>,
}

impl Asset {
    pub fn new(name: AssetName, data: Vec<u8>) -> Self {
        Self { name, data }
    }
}

// Keeps key material out of debug output.
impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}
