// src/cert/mod.rs
pub mod altnames;
pub mod api_server;
pub mod ca;
mod error;
pub mod etcd;
pub mod inspect;
pub mod kubelet;
mod master;
pub mod operations;
pub mod pem;
mod service_account;
pub mod tls;
pub mod types;
pub mod verification;

pub use ca::CertificateAuthority;
pub use error::AssetError;
pub use etcd::ExternalEtcdMaterial;
pub use operations::{generate_assets, AssetRequest, EtcdTopology};
pub use types::Asset;
