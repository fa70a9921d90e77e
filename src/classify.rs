//! Classification of DHCPREQUEST messages into RFC 2131 §4.3.2 client states.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::packet::ClientInfo;

/// The client state a DHCPREQUEST was sent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Answering an OFFER: server identifier and requested address set, no ciaddr.
    Selecting,
    /// Rebooting with a remembered address: requested address set, no server identifier.
    InitReboot,
    /// Extending a lease by unicast to the server.
    Renewing,
    /// Extending a lease by broadcast after T2.
    Rebinding,
    /// Matches none of the above.
    Unknown,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selecting => write!(f, "SELECTING"),
            Self::InitReboot => write!(f, "INIT-REBOOT"),
            Self::Renewing => write!(f, "RENEWING"),
            Self::Rebinding => write!(f, "REBINDING"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classifies a REQUEST. Rules are tried in order and the first match wins.
///
/// `source` is the datagram's source endpoint: RENEWING requires it to be the
/// server's own address, REBINDING the limited broadcast address.
pub fn classify(client: &ClientInfo, source: SocketAddr, server_ip: Ipv4Addr) -> RequestKind {
    let has_server_id = client.server_identifier.is_some();
    let has_requested = client.requested_address.is_some();
    let no_client_address = client.client_address.is_unspecified();
    let source_ip = match source.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    };

    match (has_server_id, has_requested) {
        (true, true) if no_client_address => RequestKind::Selecting,
        (false, true) if no_client_address => RequestKind::InitReboot,
        (false, false) if source_ip == Some(server_ip) => RequestKind::Renewing,
        (false, false) if source_ip == Some(Ipv4Addr::BROADCAST) => RequestKind::Rebinding,
        _ => RequestKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);
    const OTHER: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 77);

    fn client(
        server_identifier: Option<Ipv4Addr>,
        requested_address: Option<Ipv4Addr>,
        client_address: Ipv4Addr,
    ) -> ClientInfo {
        ClientInfo {
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
            client_identifier: None,
            requested_address,
            server_identifier,
            client_address,
            your_address: Ipv4Addr::UNSPECIFIED,
            relay_address: Ipv4Addr::UNSPECIFIED,
            transaction_id: 1,
            broadcast: false,
        }
    }

    fn from(ip: Ipv4Addr) -> SocketAddr {
        SocketAddr::from((ip, 68))
    }

    fn expected(
        server_id: bool,
        requested: bool,
        zero_ciaddr: bool,
        source: Ipv4Addr,
    ) -> RequestKind {
        if server_id && requested && zero_ciaddr {
            RequestKind::Selecting
        } else if !server_id && requested && zero_ciaddr {
            RequestKind::InitReboot
        } else if !server_id && !requested && source == SERVER {
            RequestKind::Renewing
        } else if !server_id && !requested && source == Ipv4Addr::BROADCAST {
            RequestKind::Rebinding
        } else {
            RequestKind::Unknown
        }
    }

    #[test]
    fn test_selecting() {
        let info = client(Some(SERVER), Some(OTHER), Ipv4Addr::UNSPECIFIED);
        assert_eq!(
            classify(&info, from(Ipv4Addr::UNSPECIFIED), SERVER),
            RequestKind::Selecting
        );
    }

    #[test]
    fn test_init_reboot() {
        let info = client(None, Some(OTHER), Ipv4Addr::UNSPECIFIED);
        assert_eq!(
            classify(&info, from(Ipv4Addr::UNSPECIFIED), SERVER),
            RequestKind::InitReboot
        );
    }

    #[test]
    fn test_renewing_requires_source_equal_to_server() {
        let info = client(None, None, OTHER);
        assert_eq!(classify(&info, from(SERVER), SERVER), RequestKind::Renewing);
        assert_eq!(classify(&info, from(OTHER), SERVER), RequestKind::Unknown);
    }

    #[test]
    fn test_rebinding() {
        let info = client(None, None, OTHER);
        assert_eq!(
            classify(&info, from(Ipv4Addr::BROADCAST), SERVER),
            RequestKind::Rebinding
        );
    }

    #[test]
    fn test_ipv6_source_is_unknown() {
        let info = client(None, None, OTHER);
        let source: SocketAddr = "[::1]:68".parse().unwrap();
        assert_eq!(classify(&info, source, SERVER), RequestKind::Unknown);
    }

    #[test]
    fn test_classification_is_total() {
        let sources = [SERVER, Ipv4Addr::BROADCAST, OTHER];
        for server_id in [false, true] {
            for requested in [false, true] {
                for zero_ciaddr in [false, true] {
                    for source in sources {
                        let info = client(
                            server_id.then_some(SERVER),
                            requested.then_some(OTHER),
                            if zero_ciaddr {
                                Ipv4Addr::UNSPECIFIED
                            } else {
                                OTHER
                            },
                        );
                        assert_eq!(
                            classify(&info, from(source), SERVER),
                            expected(server_id, requested, zero_ciaddr, source),
                            "server_id={} requested={} zero_ciaddr={} source={}",
                            server_id,
                            requested,
                            zero_ciaddr,
                            source
                        );
                    }
                }
            }
        }
    }
}
