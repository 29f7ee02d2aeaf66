// src/cert/api_server.rs
use super::types::{AltNames, CertConfig};

pub const API_SERVER_COMMON_NAME: &str = "kube-apiserver";
pub const API_SERVER_ORGANIZATION: &str = "kube-master";

/// In-cluster names of the `kubernetes` service. Always appended to the API
/// server SANs, even when the caller already listed them.
pub const KUBERNETES_SERVICE_DNS_NAMES: [&str; 4] = [
    "kubernetes",
    "kubernetes.default",
    "kubernetes.default.svc",
    "kubernetes.default.svc.cluster.local",
];

pub fn api_server_config(alt_names: &AltNames) -> CertConfig {
    let mut alt_names = alt_names.clone();
    alt_names
        .dns_names
        .extend(KUBERNETES_SERVICE_DNS_NAMES.iter().map(|name| name.to_string()));

    CertConfig::new(API_SERVER_COMMON_NAME, &[API_SERVER_ORGANIZATION]).with_alt_names(alt_names)
}
