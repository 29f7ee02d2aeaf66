// config/types.rs
use super::network::ServiceNetwork;
use crate::cert::AssetError;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub asset_dir: String,
    pub api_servers: Vec<String>,
    pub service_cidr: String,
    pub etcd_servers: Vec<String>,
    pub self_hosted_etcd: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_certificate_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_private_key_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etcd_ca_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etcd_client_certificate_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etcd_client_key_path: Option<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            asset_dir: "assets".to_string(),
            api_servers: vec!["https://127.0.0.1:443".to_string()],
            service_cidr: "10.3.0.0/24".to_string(),
            etcd_servers: vec!["http://127.0.0.1:2379".to_string()],
            self_hosted_etcd: false,
            ca_certificate_path: None,
            ca_private_key_path: None,
            etcd_ca_path: None,
            etcd_client_certificate_path: None,
            etcd_client_key_path: None,
        }
    }
}

impl BootstrapConfig {
    pub fn load_from_file(path: &str) -> io::Result<Self> {
        let config_str = fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to_file(&self, path: &str) -> io::Result<()> {
        let config_str = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, config_str)
    }

    pub fn validate(&self) -> Result<(), AssetError> {
        if self.asset_dir.trim().is_empty() {
            return Err(AssetError::Config("asset_dir must not be empty".to_string()));
        }
        if self.api_servers.is_empty() {
            return Err(AssetError::Config("at least one API server is required".to_string()));
        }
        self.api_server_urls()?;
        self.etcd_server_urls()?;
        self.service_network()?;

        if self.ca_certificate_path.is_some() != self.ca_private_key_path.is_some() {
            return Err(AssetError::Config(
                "ca_certificate_path and ca_private_key_path must be set together".to_string(),
            ));
        }

        let etcd_paths = [
            &self.etcd_ca_path,
            &self.etcd_client_certificate_path,
            &self.etcd_client_key_path,
        ];
        let supplied = etcd_paths.iter().filter(|p| p.is_some()).count();
        if supplied != 0 && supplied != etcd_paths.len() {
            return Err(AssetError::Config(
                "etcd_ca_path, etcd_client_certificate_path and etcd_client_key_path must be set together"
                    .to_string(),
            ));
        }
        if supplied != 0 && self.self_hosted_etcd {
            return Err(AssetError::Config(
                "self-hosted etcd generates its own certificates; drop the etcd certificate paths"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn asset_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.asset_dir).to_string())
    }

    pub fn api_server_urls(&self) -> Result<Vec<Url>, AssetError> {
        parse_urls("api_servers", &self.api_servers)
    }

    pub fn etcd_server_urls(&self) -> Result<Vec<Url>, AssetError> {
        parse_urls("etcd_servers", &self.etcd_servers)
    }

    pub fn service_network(&self) -> Result<ServiceNetwork, AssetError> {
        self.service_cidr
            .parse()
            .map_err(|e| AssetError::Config(format!("service_cidr: {}", e)))
    }

    pub fn has_etcd_material(&self) -> bool {
        self.etcd_ca_path.is_some()
    }

    /// etcd is spoken to over TLS when any server is https or certs were supplied.
    pub fn etcd_uses_tls(&self) -> Result<bool, AssetError> {
        let https = self
            .etcd_server_urls()?
            .iter()
            .any(|url| url.scheme() == "https");
        Ok(https || self.has_etcd_material())
    }
}

fn parse_urls(field: &str, values: &[String]) -> Result<Vec<Url>, AssetError> {
    values
        .iter()
        .map(|value| {
            let url = Url::parse(value).map_err(|e| {
                AssetError::Config(format!("{}: invalid URL {}: {}", field, value, e))
            })?;
            if url.host_str().is_none() {
                return Err(AssetError::Config(format!("{}: URL {} has no host", field, value)));
            }
            Ok(url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let config = BootstrapConfig::default();
        config.validate().unwrap();
        assert!(!config.etcd_uses_tls().unwrap());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bootstrap_config.json");
        let path = path.to_str().unwrap();

        let config = BootstrapConfig {
            self_hosted_etcd: true,
            api_servers: vec!["https://k8s.example.com:6443".to_string()],
            ..BootstrapConfig::default()
        };
        config.save_to_file(path).unwrap();
        assert_eq!(BootstrapConfig::load_from_file(path).unwrap(), config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: BootstrapConfig =
            serde_json::from_str(r#"{"etcd_servers": ["https://10.0.0.5:2379"]}"#).unwrap();
        assert_eq!(config.service_cidr, "10.3.0.0/24");
        assert!(config.etcd_uses_tls().unwrap());
    }

    #[test]
    fn half_supplied_ca_is_rejected() {
        let config = BootstrapConfig {
            ca_certificate_path: Some("ca.crt".to_string()),
            ..BootstrapConfig::default()
        };
        assert!(matches!(config.validate(), Err(AssetError::Config(_))));
    }

    #[test]
    fn half_supplied_etcd_material_is_rejected() {
        let config = BootstrapConfig {
            etcd_ca_path: Some("etcd-ca.crt".to_string()),
            etcd_client_key_path: Some("etcd-client.key".to_string()),
            ..BootstrapConfig::default()
        };
        assert!(matches!(config.validate(), Err(AssetError::Config(_))));
    }

    #[test]
    fn self_hosted_refuses_supplied_etcd_material() {
        let config = BootstrapConfig {
            self_hosted_etcd: true,
            etcd_ca_path: Some("etcd-ca.crt".to_string()),
            etcd_client_certificate_path: Some("etcd-client.crt".to_string()),
            etcd_client_key_path: Some("etcd-client.key".to_string()),
            ..BootstrapConfig::default()
        };
        assert!(matches!(config.validate(), Err(AssetError::Config(_))));
    }

    #[test]
    fn bad_urls_and_cidrs_are_rejected() {
        let config = BootstrapConfig {
            api_servers: vec!["not a url".to_string()],
            ..BootstrapConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BootstrapConfig {
            service_cidr: "10.3.0.0".to_string(),
            ..BootstrapConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
