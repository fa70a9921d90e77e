use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::classify::{RequestKind, classify};
use crate::config::{LocalInterface, ServerIdentity, ServerSettings};
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::options::{MessageType, Options};
use crate::packet::{ClientInfo, DhcpPacket};
use crate::pool::{LeasePool, PooledAddress};
use crate::transport::{Destination, Transport};

/// The DHCP server core.
///
/// Handles one datagram at a time through [`handle`](Self::handle). The lease
/// pool is the only mutable state and sits behind a single mutex, so `handle`
/// may also be called from several threads.
pub struct DhcpServer {
    settings: ServerSettings,
    identity: ServerIdentity,
    pool: Mutex<LeasePool>,
    transport: Arc<dyn Transport>,
    events: Arc<dyn EventSink>,
}

impl DhcpServer {
    /// Validates `settings` against the host's `interfaces` and builds the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the settings cannot start a server.
    pub fn new(
        settings: ServerSettings,
        interfaces: &[LocalInterface],
        transport: Arc<dyn Transport>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let identity = settings.validate(interfaces)?;
        let pool = LeasePool::new(identity.ip, identity.subnet_mask, settings.range());

        events.info(&format!(
            "Server {}/{} with {} pooled addresses",
            identity.ip,
            identity.subnet_mask,
            pool.len()
        ));

        Ok(Self {
            settings,
            identity,
            pool: Mutex::new(pool),
            transport,
            events,
        })
    }

    pub fn identity(&self) -> ServerIdentity {
        self.identity
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Returns a copy of every pool entry in pool order.
    pub fn pool_snapshot(&self) -> Vec<PooledAddress> {
        self.pool().entries().to_vec()
    }

    pub(crate) fn pool(&self) -> MutexGuard<'_, LeasePool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handles one inbound datagram received from `source`.
    ///
    /// Never fails: malformed packets, protocol violations and send failures
    /// are reported to the event sink and the datagram is dropped.
    pub fn handle(&self, data: &[u8], source: SocketAddr) {
        match self.process(data, source) {
            Ok(()) => {}
            Err(Error::PoolExhausted) => self.events.warning("no address available to offer"),
            Err(error) => self
                .events
                .error(&format!("Dropped packet from {}: {}", source, error)),
        }
    }

    fn process(&self, data: &[u8], source: SocketAddr) -> Result<()> {
        let packet = DhcpPacket::decode(data)?;
        let message_type = packet.options.message_type()?;
        let client = ClientInfo::from_packet(&packet)?;

        match message_type {
            MessageType::Discover => self.handle_discover(packet, &client),
            MessageType::Request => self.handle_request(packet, &client, source),
            MessageType::Decline => self.handle_decline(&client),
            MessageType::Release => self.handle_release(&client),
            MessageType::Inform => self.handle_inform(packet, &client),
            MessageType::Offer | MessageType::Ack | MessageType::Nak => Err(
                Error::ProtocolViolation(format!("{} is only sent by servers", message_type)),
            ),
        }
    }

    fn handle_discover(&self, packet: DhcpPacket, client: &ClientInfo) -> Result<()> {
        self.events.info("DHCPDISCOVER received");
        self.events.discovered(client);

        let offered = self
            .pool()
            .find_for_offer(&client.mac)
            .ok_or(Error::PoolExhausted)?;

        self.send_reply(
            packet,
            MessageType::Offer,
            MessageType::Discover,
            offered,
            Destination::Broadcast,
        )?;
        self.events
            .info(&format!("DHCPOFFER sent: {} to {}", offered, client.mac));

        Ok(())
    }

    fn handle_request(
        &self,
        packet: DhcpPacket,
        client: &ClientInfo,
        source: SocketAddr,
    ) -> Result<()> {
        self.events.info("DHCPREQUEST received");
        self.events.requested(client);

        let kind = classify(client, source, self.identity.ip);
        if kind == RequestKind::Unknown {
            return Err(Error::ProtocolViolation(format!(
                "DHCPREQUEST from {} matches no client state",
                client.mac
            )));
        }
        self.events.info(&format!("DHCPREQUEST in {} state", kind));

        let (granted, destination) = match (kind, client.requested_address) {
            (RequestKind::Selecting, Some(requested)) => {
                if client.server_identifier != Some(self.identity.ip) {
                    return Ok(());
                }
                let confirmed = self.pool().confirm(requested, &client.mac);
                (confirmed.then_some(requested), Destination::Broadcast)
            }
            (RequestKind::InitReboot, Some(requested)) => {
                if client.is_relayed() {
                    self.events.info("relay agent forwarding is not supported");
                }
                let owned = self.pool().reauthorize_if_owned(requested, &client.mac);
                (owned.then_some(requested), Destination::Broadcast)
            }
            (RequestKind::Renewing, _) => {
                let address = client.client_address;
                let owned = self.pool().reauthorize_if_owned(address, &client.mac);
                (owned.then_some(address), Destination::Unicast(address))
            }
            (RequestKind::Rebinding, _) => {
                let allocated = self.pool().allocate_any_free(&client.mac);
                (allocated, Destination::Broadcast)
            }
            _ => (None, Destination::Broadcast),
        };

        let Some(address) = granted else {
            return Ok(());
        };

        self.send_reply(
            packet,
            MessageType::Ack,
            MessageType::Request,
            address,
            destination,
        )?;
        self.events
            .info(&format!("DHCPACK sent: {} to {}", address, client.mac));

        Ok(())
    }

    fn handle_decline(&self, client: &ClientInfo) -> Result<()> {
        self.events.info("DHCPDECLINE received");

        if self.pool().withdraw(client.client_address) {
            self.events.info(&format!(
                "{} withdrawn from the pool after decline by {}",
                client.client_address, client.mac
            ));
        }

        Ok(())
    }

    fn handle_release(&self, client: &ClientInfo) -> Result<()> {
        self.events.info("DHCPRELEASE received");

        if self.pool().release(client.client_address) {
            self.events.info(&format!(
                "{} released by {}",
                client.client_address, client.mac
            ));
        }

        Ok(())
    }

    fn handle_inform(&self, packet: DhcpPacket, client: &ClientInfo) -> Result<()> {
        self.events.info("DHCPINFORM received");

        self.send_reply(
            packet,
            MessageType::Ack,
            MessageType::Inform,
            Ipv4Addr::UNSPECIFIED,
            Destination::Unicast(client.client_address),
        )?;
        self.events
            .info(&format!("DHCPACK sent: configuration to {}", client.mac));

        Ok(())
    }

    fn send_reply(
        &self,
        request: DhcpPacket,
        reply_type: MessageType,
        inbound_type: MessageType,
        your_address: Ipv4Addr,
        destination: Destination,
    ) -> Result<()> {
        let options = Options::build_reply(
            reply_type,
            inbound_type,
            &self.identity,
            &self.settings,
            request.options.parameter_request_list(),
        );

        let reply = request.into_reply(your_address, options).build();

        self.transport
            .send(destination, reply.as_bytes())
            .map_err(|error| {
                Error::Socket(format!(
                    "Failed to send {} to {}: {}",
                    reply_type, destination, error
                ))
            })
    }
}
