mod network;
mod types;

pub use network::{
    NetworkError, BOOTSTRAP_ETCD_SERVICE_IP_OFFSET, ETCD_SERVICE_IP_OFFSET,
    KUBERNETES_SERVICE_IP_OFFSET,
};
pub use types::BootstrapConfig;
