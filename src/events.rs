//! Notifications from the server core.
//!
//! The core never logs directly. It reports protocol milestones, warnings and
//! errors to an [`EventSink`] passed in at construction and calls it
//! synchronously while handling each datagram.

use tracing::{error, info, warn};

use crate::packet::ClientInfo;

/// Receiver of server notifications.
pub trait EventSink: Send + Sync {
    /// Protocol milestone, e.g. "DHCPOFFER sent".
    fn info(&self, message: &str);

    /// Unexpected but recoverable condition, e.g. pool exhaustion.
    fn warning(&self, message: &str);

    /// A dropped datagram or a failed send.
    fn error(&self, message: &str);

    /// A DHCPDISCOVER was decoded.
    fn discovered(&self, _client: &ClientInfo) {}

    /// A DHCPREQUEST was decoded.
    fn requested(&self, _client: &ClientInfo) {}
}

/// Forwards notifications to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
    }

    fn discovered(&self, client: &ClientInfo) {
        info!(
            mac = %client.mac,
            xid = %format!("{:#010x}", client.transaction_id),
            requested = ?client.requested_address,
            "Client discovered"
        );
    }

    fn requested(&self, client: &ClientInfo) {
        info!(
            mac = %client.mac,
            xid = %format!("{:#010x}", client.transaction_id),
            ciaddr = %client.client_address,
            requested = ?client.requested_address,
            server_id = ?client.server_identifier,
            "Client requested"
        );
    }
}
