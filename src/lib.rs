//! # dhcpool
//!
//! A DHCP server core implementing RFC 2131 (DHCP) and RFC 2132 (DHCP Options)
//! over an in-memory address pool.
//!
//! ## Features
//!
//! - DISCOVER, REQUEST, DECLINE, RELEASE and INFORM handling; OFFER and ACK replies
//! - REQUEST classification into SELECTING, INIT-REBOOT, RENEWING and REBINDING
//! - Address pool built from an explicit range or the whole server subnet
//! - Settings validated against the host's interfaces before startup
//! - Pluggable transport and event sink; UDP and `tracing` implementations included
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dhcpool::{DhcpServer, LocalInterface, ServerSettings, TracingEventSink, UdpTransport};
//!
//! #[tokio::main]
//! async fn main() -> dhcpool::Result<()> {
//!     let settings = ServerSettings::load_or_create("config.json")?;
//!     let transport = Arc::new(UdpTransport::bind()?);
//!     let server = DhcpServer::new(
//!         settings,
//!         &LocalInterface::discover(),
//!         transport.clone(),
//!         Arc::new(TracingEventSink),
//!     )?;
//!     transport.serve(&server).await
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`DhcpServer`] - Dispatches each inbound datagram and owns the [`LeasePool`]
//! - [`DhcpPacket`] - Packet decoding; [`BuiltPacket`] is the encoded reply
//! - [`Options`] - TLV option list with typed accessors and reply construction
//! - [`classify()`] - Maps a REQUEST to its RFC 2131 client state
//! - [`Transport`] / [`EventSink`] - Outbound datagrams and notifications
//! - [`ServerSettings`] - JSON settings, validated into a [`ServerIdentity`]

pub mod addr;
pub mod classify;
pub mod config;
pub mod error;
pub mod events;
pub mod options;
pub mod packet;
pub mod pool;
pub mod server;
pub mod transport;

pub use classify::{RequestKind, classify};
pub use config::{LocalInterface, ServerIdentity, ServerSettings};
pub use error::{Error, Result};
pub use events::{EventSink, TracingEventSink};
pub use options::{DhcpOption, MessageType, OptionEntry, Options};
pub use packet::{BuiltPacket, ClientInfo, DhcpPacket};
pub use pool::{LeasePool, PooledAddress};
pub use server::DhcpServer;
pub use transport::{Destination, Transport, UdpTransport};
