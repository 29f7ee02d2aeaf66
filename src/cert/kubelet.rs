use super::types::CertConfig;

// src/cert/kubelet.rs
pub const KUBELET_COMMON_NAME: &str = "kubelet";

/// TLS organizations map to Kubernetes groups and `system:masters` grants
/// cluster-admin. Kubelets sit in it until bootstrap credentials get scoped
/// down per node.
pub const KUBELET_ORGANIZATION: &str = "system:masters";

pub fn kubelet_config() -> CertConfig {
    CertConfig::new(KUBELET_COMMON_NAME, &[KUBELET_ORGANIZATION])
}
