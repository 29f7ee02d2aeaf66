// config/network.rs
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

pub const KUBERNETES_SERVICE_IP_OFFSET: u32 = 1;
pub const ETCD_SERVICE_IP_OFFSET: u32 = 15;
pub const BOOTSTRAP_ETCD_SERVICE_IP_OFFSET: u32 = 20;

/// The cluster service range, e.g. `10.3.0.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceNetwork {
    network: IpAddr,
    prefix: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NetworkError(pub String);

impl FromStr for ServiceNetwork {
    type Err = NetworkError;

    fn from_str(cidr: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = cidr
            .split_once('/')
            .ok_or_else(|| NetworkError(format!("invalid CIDR {}: missing prefix", cidr)))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| NetworkError(format!("invalid CIDR {}: bad address", cidr)))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| NetworkError(format!("invalid CIDR {}: bad prefix", cidr)))?;

        let network = match addr {
            IpAddr::V4(v4) if prefix <= 32 => {
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & v4_mask(prefix)))
            }
            IpAddr::V6(v6) if prefix <= 128 => {
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & v6_mask(prefix)))
            }
            _ => return Err(NetworkError(format!("invalid CIDR {}: prefix too long", cidr))),
        };
        Ok(Self { network, prefix })
    }
}

impl fmt::Display for ServiceNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl ServiceNetwork {
    /// The address `offset` hosts into the network.
    pub fn service_ip(&self, offset: u32) -> Result<IpAddr, NetworkError> {
        let out_of_range =
            || NetworkError(format!("service IP offset {} is outside {}", offset, self));
        match self.network {
            IpAddr::V4(v4) => {
                let size = 1u64 << (32 - u32::from(self.prefix));
                if u64::from(offset) >= size {
                    return Err(out_of_range());
                }
                Ok(IpAddr::V4(Ipv4Addr::from(u32::from(v4) + offset)))
            }
            IpAddr::V6(v6) => {
                let host_bits = 128 - u32::from(self.prefix);
                if host_bits < 32 && u64::from(offset) >= 1u64 << host_bits {
                    return Err(out_of_range());
                }
                Ok(IpAddr::V6(Ipv6Addr::from(u128::from(v6) + u128::from(offset))))
            }
        }
    }
}

fn v4_mask(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

fn v6_mask(prefix: u8) -> u128 {
    u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0)
}
