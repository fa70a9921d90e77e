use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use crate::addr;
use crate::error::{Error, Result};

/// Server settings as stored in the JSON settings file.
///
/// Every address is optional on disk; [`validate`](Self::validate) decides
/// whether the combination can start a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub server_ip: Option<Ipv4Addr>,
    pub start_ip: Option<Ipv4Addr>,
    pub end_ip: Option<Ipv4Addr>,
    pub subnet_mask: Option<Ipv4Addr>,
    pub router_ip: Option<Ipv4Addr>,
    pub dns_ip: Option<Ipv4Addr>,
    pub domain_name: Option<String>,
    pub server_name: Option<String>,
    pub lease_time: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            server_ip: None,
            start_ip: None,
            end_ip: None,
            subnet_mask: None,
            router_ip: None,
            dns_ip: None,
            domain_name: None,
            server_name: None,
            lease_time: 86400,
        }
    }
}

/// The validated address of the server and the mask of the interface it is
/// bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerIdentity {
    pub ip: Ipv4Addr,
    pub subnet_mask: Ipv4Addr,
}

/// One IPv4 address bound to a local network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInterface {
    pub name: String,
    pub address: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl LocalInterface {
    pub fn new(name: impl Into<String>, address: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            address,
            netmask,
        }
    }

    /// Lists every IPv4 address configured on this host.
    pub fn discover() -> Vec<Self> {
        pnet::datalink::interfaces()
            .into_iter()
            .flat_map(|iface| {
                let name = iface.name;
                iface
                    .ips
                    .into_iter()
                    .filter_map(move |network| match (network.ip(), network.mask()) {
                        (IpAddr::V4(address), IpAddr::V4(netmask)) => {
                            Some(Self::new(name.clone(), address, netmask))
                        }
                        _ => None,
                    })
            })
            .collect()
    }
}

impl ServerSettings {
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            let settings = ServerSettings::default();
            settings.save(path)?;
            Ok(settings)
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the explicit lease range, if both bounds are set.
    pub fn range(&self) -> Option<(Ipv4Addr, Ipv4Addr)> {
        self.start_ip.zip(self.end_ip)
    }

    /// Value for the Domain Name option: `domain_name`, else `server_name`.
    pub fn reply_domain_name(&self) -> Option<&str> {
        self.domain_name
            .as_deref()
            .or(self.server_name.as_deref())
    }

    /// Checks the settings against the host's interfaces.
    ///
    /// The checks run in this order and the first failure wins:
    ///
    /// 1. `server_ip` is set
    /// 2. `server_ip` is bound to one of `interfaces`
    /// 3. `start_ip` and `end_ip` are both set or both absent
    /// 4. `subnet_mask`, when set, equals the interface's mask
    /// 5. both range bounds are in the server's subnet
    /// 6. `start_ip` is not above `end_ip`
    /// 7. `lease_time` is not zero
    ///
    /// The returned identity always carries the interface's mask.
    pub fn validate(&self, interfaces: &[LocalInterface]) -> Result<ServerIdentity> {
        let server_ip = self
            .server_ip
            .ok_or_else(|| Error::InvalidConfig("server_ip is required".to_string()))?;

        let interface = interfaces
            .iter()
            .find(|iface| iface.address == server_ip)
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "server_ip {} is not bound to a local interface",
                    server_ip
                ))
            })?;

        if self.start_ip.is_some() != self.end_ip.is_some() {
            return Err(Error::InvalidConfig(
                "start_ip and end_ip must be set together".to_string(),
            ));
        }

        if let Some(mask) = self.subnet_mask
            && mask != interface.netmask
        {
            return Err(Error::InvalidConfig(format!(
                "subnet_mask {} does not match {} configured on {}",
                mask, interface.netmask, interface.name
            )));
        }

        let subnet_mask = interface.netmask;

        if let Some((start, end)) = self.range() {
            for bound in [start, end] {
                if !addr::same_subnet(bound, server_ip, subnet_mask) {
                    return Err(Error::InvalidConfig(format!(
                        "{} is not in the subnet of server_ip {}/{}",
                        bound, server_ip, subnet_mask
                    )));
                }
                if bound == addr::network(server_ip, subnet_mask)
                    || bound == addr::broadcast(server_ip, subnet_mask)
                {
                    return Err(Error::InvalidConfig(format!(
                        "{} is the network or broadcast address of {}/{}",
                        bound, server_ip, subnet_mask
                    )));
                }
            }

            if u32::from(start) > u32::from(end) {
                return Err(Error::InvalidConfig(
                    "start_ip must be less than or equal to end_ip".to_string(),
                ));
            }
        }

        if self.lease_time == 0 {
            return Err(Error::InvalidConfig(
                "lease_time must be greater than 0".to_string(),
            ));
        }

        Ok(ServerIdentity {
            ip: server_ip,
            subnet_mask,
        })
    }
}
