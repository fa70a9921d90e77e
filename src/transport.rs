//! UDP transport between the server core and the network.
//!
//! [`DhcpServer`] only depends on the [`Transport`] trait: it hands over
//! finished datagrams and never awaits. [`UdpTransport`] is the production
//! implementation and also owns the receive loop.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::server::DhcpServer;

pub const DHCP_SERVER_PORT: u16 = 67;
pub const DHCP_CLIENT_PORT: u16 = 68;
const RECV_BUFFER_SIZE: usize = 1500;

/// Where a reply goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The limited broadcast address 255.255.255.255.
    Broadcast,
    /// A single client address.
    Unicast(Ipv4Addr),
}

impl Destination {
    /// The client-port socket address for this destination.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = match self {
            Self::Broadcast => Ipv4Addr::BROADCAST,
            Self::Unicast(ip) => *ip,
        };
        SocketAddr::V4(SocketAddrV4::new(ip, DHCP_CLIENT_PORT))
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Broadcast => write!(f, "broadcast"),
            Self::Unicast(ip) => write!(f, "{}", ip),
        }
    }
}

/// Outbound half of the network, as seen by the server core.
pub trait Transport: Send + Sync {
    /// Sends one datagram without blocking.
    fn send(&self, destination: Destination, payload: &[u8]) -> Result<()>;
}

/// A UDP socket bound to the DHCP server port on all interfaces.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds `0.0.0.0:67` with `SO_REUSEADDR` and `SO_BROADCAST`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind() -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|error| Error::Socket(format!("Failed to create socket: {}", error)))?;

        socket
            .set_reuse_address(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_REUSEADDR: {}", error)))?;

        socket
            .set_broadcast(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_BROADCAST: {}", error)))?;

        socket
            .set_nonblocking(true)
            .map_err(|error| Error::Socket(format!("Failed to set non-blocking: {}", error)))?;

        let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DHCP_SERVER_PORT);
        socket.bind(&bind_addr.into()).map_err(|error| {
            Error::Socket(format!("Failed to bind to {}: {}", bind_addr, error))
        })?;

        let std_socket: std::net::UdpSocket = socket.into();
        let socket = UdpSocket::from_std(std_socket).map_err(|error| {
            Error::Socket(format!("Failed to convert to tokio socket: {}", error))
        })?;

        Ok(Self { socket })
    }

    /// Receives datagrams forever, handing each one to `server` before
    /// reading the next.
    pub async fn serve(&self, server: &DhcpServer) -> Result<()> {
        let mut buffer = [0u8; RECV_BUFFER_SIZE];

        info!(
            "DHCP server listening on {}:{}",
            server.identity().ip,
            DHCP_SERVER_PORT
        );

        loop {
            match self.socket.recv_from(&mut buffer).await {
                Ok((size, source)) => server.handle(&buffer[..size], source),
                Err(error) => error!("Error receiving packet: {}", error),
            }
        }
    }
}

impl Transport for UdpTransport {
    fn send(&self, destination: Destination, payload: &[u8]) -> Result<()> {
        self.socket.try_send_to(payload, destination.socket_addr())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DHCP_SERVER_PORT, 67);
        assert_eq!(DHCP_CLIENT_PORT, 68);
        assert_eq!(RECV_BUFFER_SIZE, 1500);
    }

    #[test]
    fn test_destination_socket_addr() {
        assert_eq!(
            Destination::Broadcast.socket_addr(),
            "255.255.255.255:68".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            Destination::Unicast(Ipv4Addr::new(192, 168, 1, 50)).socket_addr(),
            "192.168.1.50:68".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_destination_display() {
        assert_eq!(Destination::Broadcast.to_string(), "broadcast");
        assert_eq!(
            Destination::Unicast(Ipv4Addr::new(10, 0, 0, 9)).to_string(),
            "10.0.0.9"
        );
    }
}
