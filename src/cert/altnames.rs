// src/cert/altnames.rs
use super::types::AltNames;
use std::net::IpAddr;
use url::Url;

/// Sorts endpoints into IP and DNS alt names. Ports are stripped and each host
/// lands in `ips` when it parses as an IP literal, otherwise in `dns_names`.
pub fn resolve<S: AsRef<str>>(endpoints: &[S]) -> AltNames {
    let mut alt_names = AltNames::default();
    for endpoint in endpoints {
        let host = strip_port(endpoint.as_ref());
        if host.is_empty() {
            continue;
        }
        match host.parse::<IpAddr>() {
            Ok(ip) => alt_names.ips.push(ip),
            Err(_) => alt_names.dns_names.push(host.to_string()),
        }
    }
    alt_names
}

pub fn resolve_urls(urls: &[Url]) -> AltNames {
    resolve(&url_hosts(urls))
}

/// The `host[:port]` part of each URL, the way it appears in the authority.
pub fn url_hosts(urls: &[Url]) -> Vec<String> {
    urls.iter()
        .filter_map(|url| {
            let host = url.host_str()?;
            Some(match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            })
        })
        .collect()
}

pub fn strip_port(hostport: &str) -> &str {
    let Some(colon) = hostport.find(':') else {
        return hostport;
    };
    match hostport.find(']') {
        Some(bracket) => hostport[..bracket].trim_start_matches('['),
        None => &hostport[..colon],
    }
}
