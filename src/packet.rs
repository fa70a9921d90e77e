//! DHCP packet decoding and encoding per RFC 2131.
//!
//! Every packet starts with the 236-byte BOOTP header and the 4-byte magic
//! cookie; the option area follows. A decoded [`DhcpPacket`] can be
//! turned into a reply with [`DhcpPacket::into_reply`] and serialized exactly
//! once with [`DhcpPacket::build`], which consumes it.
//!
//! # Packet Structure
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     op (1)    |   htype (1)   |   hlen (1)    |   hops (1)    |
//! +---------------+---------------+---------------+---------------+
//! |                            xid (4)                            |
//! +-------------------------------+-------------------------------+
//! |           secs (2)            |           flags (2)           |
//! +-------------------------------+-------------------------------+
//! |                          ciaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          yiaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          siaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          giaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          chaddr (16)                          |
//! +---------------------------------------------------------------+
//! |                          sname (64)                           |
//! +---------------------------------------------------------------+
//! |                          file (128)                           |
//! +---------------------------------------------------------------+
//! |                    magic cookie (4) = 99.130.83.99            |
//! +---------------------------------------------------------------+
//! |                          options (variable)                   |
//! +---------------------------------------------------------------+
//! ```
//!
//! # References
//!
//! - RFC 2131: Dynamic Host Configuration Protocol

use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::options::Options;

/// Marks the start of the DHCP option area.
pub const DHCP_MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

const DHCP_CHADDR_OFFSET: usize = 28;
const DHCP_CHADDR_SIZE: usize = 16;
const DHCP_SNAME_OFFSET: usize = DHCP_CHADDR_OFFSET + DHCP_CHADDR_SIZE;
const DHCP_SNAME_SIZE: usize = 64;
const DHCP_FILE_OFFSET: usize = DHCP_SNAME_OFFSET + DHCP_SNAME_SIZE;
const DHCP_FILE_SIZE: usize = 128;
const DHCP_MAGIC_COOKIE_OFFSET: usize = DHCP_FILE_OFFSET + DHCP_FILE_SIZE;

/// Header plus magic cookie: the shortest datagram accepted.
pub const DHCP_FIXED_HEADER_SIZE: usize = DHCP_MAGIC_COOKIE_OFFSET + DHCP_MAGIC_COOKIE.len();

/// Room for a typical reply's options.
const DHCP_ENCODE_CAPACITY: usize = DHCP_FIXED_HEADER_SIZE + 64;

/// Broadcast bit of the flags field.
const BROADCAST_FLAG: u16 = 0x8000;

/// `op` of client messages.
pub const BOOTREQUEST: u8 = 1;

/// `op` of server messages.
pub const BOOTREPLY: u8 = 2;

/// `htype` for Ethernet.
pub const HTYPE_ETHERNET: u8 = 1;

/// `hlen` for Ethernet.
pub const HLEN_ETHERNET: u8 = 6;

/// A decoded DHCP packet, not yet serialized.
///
/// Use [`decode`](Self::decode) to parse incoming packets,
/// [`into_reply`](Self::into_reply) to turn a request into a response and
/// [`build`](Self::build) to produce the wire bytes. Building consumes the
/// packet, so a message cannot be serialized twice.
#[derive(Debug)]
pub struct DhcpPacket {
    /// [`BOOTREQUEST`] or [`BOOTREPLY`].
    pub op: u8,
    pub htype: u8,
    /// Significant bytes of `chaddr`. Not validated.
    pub hlen: u8,
    pub hops: u8,
    /// Transaction id, echoed in the reply.
    pub xid: u32,
    pub secs: u16,
    /// Bit 15 asks for a broadcast reply.
    pub flags: u16,
    /// Address the client already holds, zero while it has none.
    pub ciaddr: Ipv4Addr,
    /// Address the server assigns.
    pub yiaddr: Ipv4Addr,
    /// Next-server address. Always zero in replies.
    pub siaddr: Ipv4Addr,
    /// Relay agent address. Passed through untouched.
    pub giaddr: Ipv4Addr,
    pub chaddr: [u8; 16],
    pub sname: [u8; 64],
    pub file: [u8; 128],
    pub options: Options,
}

fn read_address(data: &[u8], offset: usize) -> Ipv4Addr {
    Ipv4Addr::new(
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    )
}

impl DhcpPacket {
    /// Decodes a DHCP packet from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPacket`] if the packet is shorter than 240
    /// bytes or the magic cookie is not 99.130.83.99, and
    /// [`Error::MalformedOption`] if an option overruns the buffer.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < DHCP_FIXED_HEADER_SIZE {
            return Err(Error::MalformedPacket(format!(
                "Packet too short: {} bytes (minimum {})",
                data.len(),
                DHCP_FIXED_HEADER_SIZE
            )));
        }

        if data[DHCP_MAGIC_COOKIE_OFFSET..DHCP_FIXED_HEADER_SIZE] != DHCP_MAGIC_COOKIE {
            return Err(Error::MalformedPacket("Invalid magic cookie".to_string()));
        }

        let mut chaddr = [0u8; DHCP_CHADDR_SIZE];
        chaddr.copy_from_slice(&data[DHCP_CHADDR_OFFSET..DHCP_SNAME_OFFSET]);

        let mut sname = [0u8; DHCP_SNAME_SIZE];
        sname.copy_from_slice(&data[DHCP_SNAME_OFFSET..DHCP_FILE_OFFSET]);

        let mut file = [0u8; DHCP_FILE_SIZE];
        file.copy_from_slice(&data[DHCP_FILE_OFFSET..DHCP_MAGIC_COOKIE_OFFSET]);

        Ok(Self {
            op: data[0],
            htype: data[1],
            hlen: data[2],
            hops: data[3],
            xid: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            secs: u16::from_be_bytes([data[8], data[9]]),
            flags: u16::from_be_bytes([data[10], data[11]]),
            ciaddr: read_address(data, 12),
            yiaddr: read_address(data, 16),
            siaddr: read_address(data, 20),
            giaddr: read_address(data, 24),
            chaddr,
            sname,
            file,
            options: Options::parse(&data[DHCP_FIXED_HEADER_SIZE..])?,
        })
    }

    /// Turns a client request into a server reply.
    ///
    /// # Preserved Fields
    ///
    /// `xid`, `flags`, `giaddr`, `chaddr`, `htype` and `hlen` are kept from the
    /// request. `op` becomes [`BOOTREPLY`]; `hops`, `secs`, `ciaddr` and
    /// `siaddr` are zeroed and `sname`/`file` cleared. The request's options
    /// are replaced by `options`.
    pub fn into_reply(self, your_address: Ipv4Addr, options: Options) -> Self {
        Self {
            op: BOOTREPLY,
            hops: 0,
            secs: 0,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: your_address,
            siaddr: Ipv4Addr::UNSPECIFIED,
            sname: [0u8; DHCP_SNAME_SIZE],
            file: [0u8; DHCP_FILE_SIZE],
            options,
            ..self
        }
    }

    /// Serializes the packet, consuming it.
    ///
    /// The header is written in field order, followed by the magic cookie and
    /// the options with their End marker. No padding is added.
    pub fn build(self) -> BuiltPacket {
        let mut bytes = Vec::with_capacity(DHCP_ENCODE_CAPACITY);

        bytes.extend_from_slice(&[self.op, self.htype, self.hlen, self.hops]);
        bytes.extend_from_slice(&self.xid.to_be_bytes());
        bytes.extend_from_slice(&self.secs.to_be_bytes());
        bytes.extend_from_slice(&self.flags.to_be_bytes());
        for address in [self.ciaddr, self.yiaddr, self.siaddr, self.giaddr] {
            bytes.extend_from_slice(&address.octets());
        }
        bytes.extend_from_slice(&self.chaddr);
        bytes.extend_from_slice(&self.sname);
        bytes.extend_from_slice(&self.file);
        bytes.extend_from_slice(&DHCP_MAGIC_COOKIE);

        self.options.encode_into(&mut bytes);

        BuiltPacket { bytes }
    }

    /// Returns the client hardware address bytes (hlen clamped to 16).
    pub fn chaddr_bytes(&self) -> &[u8] {
        &self.chaddr[..(self.hlen as usize).min(DHCP_CHADDR_SIZE)]
    }

    /// Lowercase colon-separated hex of [`chaddr_bytes`](Self::chaddr_bytes),
    /// e.g. `aa:bb:cc:dd:ee:ff`.
    pub fn format_mac(&self) -> String {
        self.chaddr_bytes()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Returns true if the client asked for a broadcast reply.
    pub fn is_broadcast(&self) -> bool {
        (self.flags & BROADCAST_FLAG) != 0
    }
}

/// A serialized packet, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPacket {
    bytes: Vec<u8>,
}

impl BuiltPacket {
    /// Returns the wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the packet, returning the wire bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The client-facing facts of one inbound packet.
///
/// Extracted once per datagram and read by the classifier, the pool and the
/// event sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Lowercase colon-separated hardware address.
    pub mac: String,
    /// Client identifier (Option 61).
    pub client_identifier: Option<Vec<u8>>,
    /// Requested IP address (Option 50).
    pub requested_address: Option<Ipv4Addr>,
    /// Server identifier (Option 54).
    pub server_identifier: Option<Ipv4Addr>,
    /// `ciaddr`.
    pub client_address: Ipv4Addr,
    /// `yiaddr`.
    pub your_address: Ipv4Addr,
    /// `giaddr`.
    pub relay_address: Ipv4Addr,
    pub transaction_id: u32,
    pub broadcast: bool,
}

impl ClientInfo {
    /// Extracts the client view of `packet`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedOption`] if Option 50 or 54 is not 4 bytes.
    pub fn from_packet(packet: &DhcpPacket) -> Result<Self> {
        Ok(Self {
            mac: packet.format_mac(),
            client_identifier: packet.options.client_identifier().map(<[u8]>::to_vec),
            requested_address: packet.options.requested_address()?,
            server_identifier: packet.options.server_identifier()?,
            client_address: packet.ciaddr,
            your_address: packet.yiaddr,
            relay_address: packet.giaddr,
            transaction_id: packet.xid,
            broadcast: packet.is_broadcast(),
        })
    }

    /// Returns true if the packet came through a relay agent.
    pub fn is_relayed(&self) -> bool {
        !self.relay_address.is_unspecified()
    }
}
