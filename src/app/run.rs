use crate::cert::altnames::resolve_urls;
use crate::cert::inspect::inspect_certificate;
use crate::cert::verification::verify_asset_chains;
use crate::cert::{
    generate_assets, Asset, AssetError, AssetRequest, CertificateAuthority, EtcdTopology,
    ExternalEtcdMaterial,
};
use crate::config::{
    BootstrapConfig, NetworkError, BOOTSTRAP_ETCD_SERVICE_IP_OFFSET, ETCD_SERVICE_IP_OFFSET,
    KUBERNETES_SERVICE_IP_OFFSET,
};
use crate::store::write_assets;
use crate::utils::logging::Logger;
use std::path::PathBuf;

/// Turns the config into a generation request: loads supplied CA and etcd
/// material and derives service IPs and API server SANs.
pub fn build_request(config: &BootstrapConfig) -> Result<AssetRequest, AssetError> {
    let network = config.service_network()?;
    let config_error = |e: NetworkError| AssetError::Config(e.to_string());

    let mut api_alt_names = resolve_urls(&config.api_server_urls()?);
    let api_service_ip = network
        .service_ip(KUBERNETES_SERVICE_IP_OFFSET)
        .map_err(config_error)?;
    api_alt_names.ips.insert(0, api_service_ip);

    let ca = match (&config.ca_certificate_path, &config.ca_private_key_path) {
        (Some(cert), Some(key)) => Some(CertificateAuthority::load(
            &expand(cert),
            &expand(key),
        )?),
        _ => None,
    };

    let etcd = if config.self_hosted_etcd {
        EtcdTopology::SelfHosted {
            etcd_service_ip: network.service_ip(ETCD_SERVICE_IP_OFFSET).map_err(config_error)?,
            bootstrap_etcd_service_ip: network
                .service_ip(BOOTSTRAP_ETCD_SERVICE_IP_OFFSET)
                .map_err(config_error)?,
        }
    } else if config.etcd_uses_tls()? {
        let existing = match (
            &config.etcd_ca_path,
            &config.etcd_client_certificate_path,
            &config.etcd_client_key_path,
        ) {
            (Some(ca), Some(cert), Some(key)) => Some(ExternalEtcdMaterial::load(
                &expand(ca),
                &expand(cert),
                &expand(key),
            )?),
            _ => None,
        };
        EtcdTopology::External {
            existing,
            servers: config.etcd_server_urls()?,
        }
    } else {
        EtcdTopology::Plain
    };

    Ok(AssetRequest {
        ca,
        api_alt_names,
        etcd,
    })
}

pub fn run_bootstrap(
    config: &BootstrapConfig,
    logger: &mut dyn Logger,
) -> Result<Vec<Asset>, AssetError> {
    config.validate()?;

    let request = build_request(config)?;
    logger.log(&format!(
        "Generating assets (CA: {}, etcd: {})",
        if request.ca.is_some() { "supplied" } else { "new" },
        describe_topology(&request.etcd)
    ));
    logger.debug_log(&format!("API server alt names: {:?}", request.api_alt_names));

    let assets = generate_assets(request)?;
    verify_asset_chains(&assets)?;
    log_summary(&assets, logger);

    write_assets(&config.asset_dir(), &assets, logger)?;
    Ok(assets)
}

fn describe_topology(topology: &EtcdTopology) -> &'static str {
    match topology {
        EtcdTopology::Plain => "plain",
        EtcdTopology::External { existing: Some(_), .. } => "external, supplied certificates",
        EtcdTopology::External { existing: None, .. } => "external, master CA",
        EtcdTopology::SelfHosted { .. } => "self-hosted",
    }
}

fn log_summary(assets: &[Asset], logger: &mut dyn Logger) {
    for asset in assets.iter().filter(|a| a.name.is_certificate()) {
        match inspect_certificate(&asset.data) {
            Ok(info) => {
                logger.log(&format!("{}: {}", asset.name, info.subject));
                logger.debug_log(&format!(
                    "{}: issuer={} ca={} dns={:?} ip={:?} expires={} sha256={}",
                    asset.name,
                    info.issuer,
                    info.is_ca,
                    info.dns_names,
                    info.ip_addresses,
                    info.not_after.format("%Y-%m-%d"),
                    info.fingerprint
                ));
            }
            Err(e) => logger.log(&format!("{}: could not inspect certificate: {}", asset.name, e)),
        }
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
