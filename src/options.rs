//! DHCP option codec (RFC 2132).
//!
//! Options follow the magic cookie as a sequence of TLV entries: a code byte,
//! a length byte and `length` value bytes, terminated by End (255).
//!
//! [`Options`] keeps the raw TLV entries of a packet in wire order and offers
//! typed accessors for the codes the server reads. [`DhcpOption`] is the typed
//! view used to decode those values and to append values to a reply.
//!
//! # References
//!
//! - RFC 2132: DHCP Options and BOOTP Vendor Extensions

use std::net::Ipv4Addr;

use crate::config::{ServerIdentity, ServerSettings};
use crate::error::{Error, Result};

/// Longest value a single TLV entry can carry.
const MAX_OPTION_LENGTH: usize = u8::MAX as usize;

/// Most IPv4 addresses that fit one address-list value (255 / 4).
const MAX_ADDRESSES_PER_OPTION: usize = 63;

/// Option codes the server reads or writes.
///
/// Every other code is carried through [`Options`] as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OptionCode {
    /// Not special-cased when parsing: read as an ordinary TLV code.
    Pad = 0,
    SubnetMask = 1,
    Router = 3,
    DomainNameServer = 6,
    DomainName = 15,
    RequestedIpAddress = 50,
    /// Lease time in seconds, big-endian.
    LeaseTime = 51,
    MessageType = 53,
    ServerIdentifier = 54,
    ParameterRequestList = 55,
    /// T1.
    RenewalTime = 58,
    /// T2.
    RebindingTime = 59,
    ClientIdentifier = 61,
    /// Terminates the option area.
    End = 255,
}

impl TryFrom<u8> for OptionCode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pad),
            1 => Ok(Self::SubnetMask),
            3 => Ok(Self::Router),
            6 => Ok(Self::DomainNameServer),
            15 => Ok(Self::DomainName),
            50 => Ok(Self::RequestedIpAddress),
            51 => Ok(Self::LeaseTime),
            53 => Ok(Self::MessageType),
            54 => Ok(Self::ServerIdentifier),
            55 => Ok(Self::ParameterRequestList),
            58 => Ok(Self::RenewalTime),
            59 => Ok(Self::RebindingTime),
            61 => Ok(Self::ClientIdentifier),
            255 => Ok(Self::End),
            other => Err(other),
        }
    }
}

/// Values of the DHCP Message Type option (RFC 2132 §9.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Discover = 1,
    Offer = 2,
    Request = 3,
    /// The client found the address already in use.
    Decline = 4,
    Ack = 5,
    Nak = 6,
    Release = 7,
    /// Configuration only, no address.
    Inform = 8,
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Discover),
            2 => Ok(Self::Offer),
            3 => Ok(Self::Request),
            4 => Ok(Self::Decline),
            5 => Ok(Self::Ack),
            6 => Ok(Self::Nak),
            7 => Ok(Self::Release),
            8 => Ok(Self::Inform),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discover => write!(f, "DHCPDISCOVER"),
            Self::Offer => write!(f, "DHCPOFFER"),
            Self::Request => write!(f, "DHCPREQUEST"),
            Self::Decline => write!(f, "DHCPDECLINE"),
            Self::Ack => write!(f, "DHCPACK"),
            Self::Nak => write!(f, "DHCPNAK"),
            Self::Release => write!(f, "DHCPRELEASE"),
            Self::Inform => write!(f, "DHCPINFORM"),
        }
    }
}

/// The decoded value of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhcpOption {
    SubnetMask(Ipv4Addr),
    /// Gateways in preference order.
    Router(Vec<Ipv4Addr>),
    DomainNameServer(Vec<Ipv4Addr>),
    DomainName(String),
    RequestedIpAddress(Ipv4Addr),
    LeaseTime(u32),
    MessageType(MessageType),
    ServerIdentifier(Ipv4Addr),
    /// Option codes the client asks the server to fill in.
    ParameterRequestList(Vec<u8>),
    RenewalTime(u32),
    RebindingTime(u32),
    ClientIdentifier(Vec<u8>),
    /// Any code without a typed variant.
    Unknown(u8, Vec<u8>),
}

fn parse_address(data: &[u8], name: &str) -> Result<Ipv4Addr> {
    let octets: [u8; 4] = data
        .try_into()
        .map_err(|_| Error::MalformedOption(format!("Invalid {} length: {}", name, data.len())))?;
    Ok(Ipv4Addr::from(octets))
}

fn parse_addresses(data: &[u8], name: &str) -> Result<Vec<Ipv4Addr>> {
    if !data.len().is_multiple_of(4) || data.is_empty() {
        return Err(Error::MalformedOption(format!(
            "Invalid {} length: {}",
            name,
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(4)
        .map(|chunk| Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]))
        .collect())
}

fn parse_seconds(data: &[u8], name: &str) -> Result<u32> {
    let bytes: [u8; 4] = data
        .try_into()
        .map_err(|_| Error::MalformedOption(format!("Invalid {} length: {}", name, data.len())))?;
    Ok(u32::from_be_bytes(bytes))
}

fn encode_bytes(code: u8, data: &[u8]) -> Vec<u8> {
    let len = data.len().min(MAX_OPTION_LENGTH);
    let mut result = vec![code, len as u8];
    result.extend_from_slice(&data[..len]);
    result
}

fn encode_addresses(code: u8, addrs: &[Ipv4Addr]) -> Vec<u8> {
    let count = addrs.len().min(MAX_ADDRESSES_PER_OPTION);
    let mut result = vec![code, (count * 4) as u8];
    for addr in addrs.iter().take(count) {
        result.extend_from_slice(&addr.octets());
    }
    result
}

impl DhcpOption {
    pub fn code(&self) -> u8 {
        match self {
            Self::SubnetMask(_) => OptionCode::SubnetMask as u8,
            Self::Router(_) => OptionCode::Router as u8,
            Self::DomainNameServer(_) => OptionCode::DomainNameServer as u8,
            Self::DomainName(_) => OptionCode::DomainName as u8,
            Self::RequestedIpAddress(_) => OptionCode::RequestedIpAddress as u8,
            Self::LeaseTime(_) => OptionCode::LeaseTime as u8,
            Self::MessageType(_) => OptionCode::MessageType as u8,
            Self::ServerIdentifier(_) => OptionCode::ServerIdentifier as u8,
            Self::ParameterRequestList(_) => OptionCode::ParameterRequestList as u8,
            Self::RenewalTime(_) => OptionCode::RenewalTime as u8,
            Self::RebindingTime(_) => OptionCode::RebindingTime as u8,
            Self::ClientIdentifier(_) => OptionCode::ClientIdentifier as u8,
            Self::Unknown(code, _) => *code,
        }
    }

    /// Decodes the value `data` of option `code`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedOption`] if the data length is invalid for
    /// the option type, and [`Error::ProtocolViolation`] for a message type
    /// value outside RFC 2132 §9.6.
    pub fn parse(code: u8, data: &[u8]) -> Result<Self> {
        match OptionCode::try_from(code) {
            Ok(OptionCode::SubnetMask) => Ok(Self::SubnetMask(parse_address(data, "subnet mask")?)),
            Ok(OptionCode::Router) => Ok(Self::Router(parse_addresses(data, "router option")?)),
            Ok(OptionCode::DomainNameServer) => Ok(Self::DomainNameServer(parse_addresses(
                data,
                "DNS server option",
            )?)),
            Ok(OptionCode::DomainName) => {
                Ok(Self::DomainName(String::from_utf8_lossy(data).to_string()))
            }
            Ok(OptionCode::RequestedIpAddress) => Ok(Self::RequestedIpAddress(parse_address(
                data,
                "requested IP address",
            )?)),
            Ok(OptionCode::LeaseTime) => Ok(Self::LeaseTime(parse_seconds(data, "lease time")?)),
            Ok(OptionCode::MessageType) => {
                if data.len() != 1 {
                    return Err(Error::MalformedOption(format!(
                        "Invalid message type length: {}",
                        data.len()
                    )));
                }
                let msg_type = MessageType::try_from(data[0]).map_err(|value| {
                    Error::ProtocolViolation(format!("Unrecognized DHCP message type: {}", value))
                })?;
                Ok(Self::MessageType(msg_type))
            }
            Ok(OptionCode::ServerIdentifier) => Ok(Self::ServerIdentifier(parse_address(
                data,
                "server identifier",
            )?)),
            Ok(OptionCode::ParameterRequestList) => Ok(Self::ParameterRequestList(data.to_vec())),
            Ok(OptionCode::RenewalTime) => {
                Ok(Self::RenewalTime(parse_seconds(data, "renewal time")?))
            }
            Ok(OptionCode::RebindingTime) => {
                Ok(Self::RebindingTime(parse_seconds(data, "rebinding time")?))
            }
            Ok(OptionCode::ClientIdentifier) => Ok(Self::ClientIdentifier(data.to_vec())),
            Ok(OptionCode::Pad) | Ok(OptionCode::End) | Err(_) => {
                Ok(Self::Unknown(code, data.to_vec()))
            }
        }
    }

    /// Encodes as code, length and value. Values over 255 bytes are cut to fit.
    pub fn encode(&self) -> Vec<u8> {
        let code = self.code();
        match self {
            Self::SubnetMask(addr)
            | Self::RequestedIpAddress(addr)
            | Self::ServerIdentifier(addr) => encode_bytes(code, &addr.octets()),
            Self::Router(addrs) | Self::DomainNameServer(addrs) => encode_addresses(code, addrs),
            Self::DomainName(name) => encode_bytes(code, name.as_bytes()),
            Self::LeaseTime(time) | Self::RenewalTime(time) | Self::RebindingTime(time) => {
                encode_bytes(code, &time.to_be_bytes())
            }
            Self::MessageType(msg_type) => vec![code, 1, *msg_type as u8],
            Self::ParameterRequestList(data)
            | Self::ClientIdentifier(data)
            | Self::Unknown(_, data) => encode_bytes(code, data),
        }
    }
}

/// One raw TLV entry as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// Option code.
    pub code: u8,
    /// Option value, exactly `length` bytes.
    pub data: Vec<u8>,
}

/// The ordered option list of a DHCP packet.
///
/// Entries never include the End marker: parsing stops at it, and
/// [`encode_into`](Self::encode_into) always appends it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Vec<OptionEntry>,
}

impl Options {
    /// Creates an empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the option area that follows the magic cookie.
    ///
    /// Scanning stops at the first End (255) byte or at the end of the buffer.
    /// Every other byte is read as a code followed by a length byte and
    /// `length` value bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedOption`] if a length byte is missing or the
    /// declared length runs past the end of the buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut index = 0;

        while index < data.len() {
            let code = data[index];

            if code == OptionCode::End as u8 {
                break;
            }

            if index + 1 >= data.len() {
                return Err(Error::MalformedOption(format!(
                    "Option {} length missing",
                    code
                )));
            }

            let length = data[index + 1] as usize;

            if index + 2 + length > data.len() {
                return Err(Error::MalformedOption(format!(
                    "Option {} claims {} bytes but only {} remain",
                    code,
                    length,
                    data.len() - index - 2
                )));
            }

            entries.push(OptionEntry {
                code,
                data: data[index + 2..index + 2 + length].to_vec(),
            });

            index += 2 + length;
        }

        Ok(Self { entries })
    }

    /// Returns the entries in wire order.
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value of the first entry with `code`.
    pub fn get(&self, code: u8) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.data.as_slice())
    }

    fn typed(&self, code: OptionCode) -> Result<Option<DhcpOption>> {
        self.get(code as u8)
            .map(|data| DhcpOption::parse(code as u8, data))
            .transpose()
    }

    /// Returns the DHCP message type (Option 53).
    ///
    /// # Errors
    ///
    /// Every DHCP packet must carry this option: an absent option is a
    /// [`Error::MalformedPacket`], an unknown value a [`Error::ProtocolViolation`].
    pub fn message_type(&self) -> Result<MessageType> {
        match self.typed(OptionCode::MessageType)? {
            Some(DhcpOption::MessageType(msg_type)) => Ok(msg_type),
            _ => Err(Error::MalformedPacket(
                "Missing DHCP message type option".to_string(),
            )),
        }
    }

    /// Returns the requested IP address (Option 50).
    pub fn requested_address(&self) -> Result<Option<Ipv4Addr>> {
        match self.typed(OptionCode::RequestedIpAddress)? {
            Some(DhcpOption::RequestedIpAddress(addr)) => Ok(Some(addr)),
            _ => Ok(None),
        }
    }

    /// Returns the server identifier (Option 54). A SELECTING client names
    /// the server whose offer it accepts here.
    pub fn server_identifier(&self) -> Result<Option<Ipv4Addr>> {
        match self.typed(OptionCode::ServerIdentifier)? {
            Some(DhcpOption::ServerIdentifier(addr)) => Ok(Some(addr)),
            _ => Ok(None),
        }
    }

    /// Returns the raw client identifier (Option 61).
    pub fn client_identifier(&self) -> Option<&[u8]> {
        self.get(OptionCode::ClientIdentifier as u8)
    }

    /// Returns the parameter request list (Option 55), empty when absent.
    pub fn parameter_request_list(&self) -> &[u8] {
        self.get(OptionCode::ParameterRequestList as u8)
            .unwrap_or_default()
    }

    /// Appends a typed option.
    pub fn push(&mut self, option: DhcpOption) {
        let encoded = option.encode();
        self.entries.push(OptionEntry {
            code: encoded[0],
            data: encoded[2..].to_vec(),
        });
    }

    /// Writes every entry in TLV form followed by the End marker.
    pub fn encode_into(&self, buffer: &mut Vec<u8>) {
        for entry in &self.entries {
            buffer.extend_from_slice(&encode_bytes(entry.code, &entry.data));
        }
        buffer.push(OptionCode::End as u8);
    }

    /// Builds the option list of an outgoing reply.
    ///
    /// # Arguments
    ///
    /// * `reply_type` - OFFER, ACK or NAK
    /// * `inbound_type` - Message type of the packet being answered
    /// * `identity` - Server address and effective subnet mask
    /// * `settings` - Lease time and optional router/DNS/domain values
    /// * `requested` - The client's parameter request list (Option 55)
    ///
    /// # Layout
    ///
    /// 1. Message Type
    /// 2. Server Identifier (not for NAK)
    /// 3. Lease Time, T1 and T2 (OFFER, and ACK unless answering INFORM),
    ///    all equal to the configured lease time
    /// 4. Each requested code the server has a value for, in request order
    ///
    /// A NAK carries only the message type. The End marker is added on encode.
    pub fn build_reply(
        reply_type: MessageType,
        inbound_type: MessageType,
        identity: &ServerIdentity,
        settings: &ServerSettings,
        requested: &[u8],
    ) -> Self {
        let mut options = Self::new();
        options.push(DhcpOption::MessageType(reply_type));

        if reply_type == MessageType::Nak {
            return options;
        }

        options.push(DhcpOption::ServerIdentifier(identity.ip));

        let grants_lease = match reply_type {
            MessageType::Offer => true,
            MessageType::Ack => inbound_type != MessageType::Inform,
            _ => false,
        };
        if grants_lease {
            options.push(DhcpOption::LeaseTime(settings.lease_time));
            options.push(DhcpOption::RenewalTime(settings.lease_time));
            options.push(DhcpOption::RebindingTime(settings.lease_time));
        }

        for &code in requested {
            let value = match OptionCode::try_from(code) {
                Ok(OptionCode::SubnetMask) => Some(DhcpOption::SubnetMask(identity.subnet_mask)),
                Ok(OptionCode::Router) => settings.router_ip.map(|ip| DhcpOption::Router(vec![ip])),
                Ok(OptionCode::DomainNameServer) => settings
                    .dns_ip
                    .map(|ip| DhcpOption::DomainNameServer(vec![ip])),
                Ok(OptionCode::DomainName) => settings
                    .reply_domain_name()
                    .map(|name| DhcpOption::DomainName(name.to_string())),
                _ => None,
            };
            if let Some(option) = value {
                options.push(option);
            }
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ServerIdentity {
        ServerIdentity {
            ip: Ipv4Addr::new(192, 168, 1, 1),
            subnet_mask: Ipv4Addr::new(255, 255, 255, 0),
        }
    }

    fn settings() -> ServerSettings {
        ServerSettings {
            router_ip: Some(Ipv4Addr::new(192, 168, 1, 254)),
            dns_ip: None,
            domain_name: Some("lab.local".to_string()),
            lease_time: 7200,
            ..Default::default()
        }
    }

    fn codes(options: &Options) -> Vec<u8> {
        options.entries().iter().map(|entry| entry.code).collect()
    }

    #[test]
    fn test_message_type_conversions() {
        for value in 1..=8u8 {
            let msg_type = MessageType::try_from(value).unwrap();
            assert_eq!(msg_type as u8, value);
        }
        assert!(MessageType::try_from(0).is_err());
        assert!(MessageType::try_from(9).is_err());
    }

    #[test]
    fn test_typed_parse_values() {
        assert_eq!(
            DhcpOption::parse(1, &[255, 255, 240, 0]).unwrap(),
            DhcpOption::SubnetMask(Ipv4Addr::new(255, 255, 240, 0))
        );
        assert_eq!(
            DhcpOption::parse(6, &[1, 1, 1, 1, 9, 9, 9, 9]).unwrap(),
            DhcpOption::DomainNameServer(vec![Ipv4Addr::new(1, 1, 1, 1), Ipv4Addr::new(9, 9, 9, 9)])
        );
        assert_eq!(
            DhcpOption::parse(51, &[0, 1, 0x51, 0x80]).unwrap(),
            DhcpOption::LeaseTime(86400)
        );
        assert_eq!(
            DhcpOption::parse(42, &[1, 2]).unwrap(),
            DhcpOption::Unknown(42, vec![1, 2])
        );
    }

    #[test]
    fn test_encode_truncates_long_values() {
        let encoded = DhcpOption::DomainName("a".repeat(300)).encode();
        assert_eq!(encoded[0], 15);
        assert_eq!(encoded[1], 255);
        assert_eq!(encoded.len(), 257);
    }

    #[test]
    fn test_option_invalid_lengths() {
        assert!(DhcpOption::parse(1, &[255, 255, 255]).is_err());
        assert!(DhcpOption::parse(3, &[]).is_err());
        assert!(DhcpOption::parse(51, &[0, 0, 0]).is_err());
        assert!(matches!(
            DhcpOption::parse(50, &[10, 0, 0]),
            Err(Error::MalformedOption(_))
        ));
    }

    #[test]
    fn test_unknown_message_type_is_protocol_violation() {
        assert!(matches!(
            DhcpOption::parse(53, &[9]),
            Err(Error::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_parse_entries_in_order() {
        let data = [
            53, 1, 3, // message type
            50, 4, 10, 0, 0, 7, // requested address
            12, 3, b'a', b'b', b'c', // hostname (not understood)
            255, 1, 2, 3,
        ];

        let options = Options::parse(&data).unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(codes(&options), vec![53, 50, 12]);
        assert_eq!(options.get(53), Some(&[3u8][..]));
        assert_eq!(options.get(12), Some(&b"abc"[..]));
        assert_eq!(
            options.requested_address().unwrap(),
            Some(Ipv4Addr::new(10, 0, 0, 7))
        );
        assert_eq!(options.message_type().unwrap(), MessageType::Request);
    }

    #[test]
    fn test_get_is_first_match() {
        let data = [54, 4, 10, 0, 0, 1, 54, 4, 10, 0, 0, 2, 255];
        let options = Options::parse(&data).unwrap();
        assert_eq!(
            options.server_identifier().unwrap(),
            Some(Ipv4Addr::new(10, 0, 0, 1))
        );
    }

    #[test]
    fn test_get_stops_at_end_marker() {
        let data = [53, 1, 1, 255, 54, 4, 10, 0, 0, 1];
        let options = Options::parse(&data).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options.get(54), None);
    }

    #[test]
    fn test_parse_without_end_marker() {
        let options = Options::parse(&[53, 1, 1]).unwrap();
        assert_eq!(options.len(), 1);
        assert!(Options::parse(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_pad_byte_is_read_as_code() {
        // Code 0 with length 2: consumes the next two bytes as its value.
        let options = Options::parse(&[0, 2, 7, 7, 53, 1, 1]).unwrap();
        assert_eq!(codes(&options), vec![0, 53]);
    }

    #[test]
    fn test_truncated_entry_is_rejected() {
        assert!(matches!(
            Options::parse(&[53, 1, 1, 54, 4, 10, 0]),
            Err(Error::MalformedOption(_))
        ));
        assert!(matches!(
            Options::parse(&[53]),
            Err(Error::MalformedOption(_))
        ));
    }

    #[test]
    fn test_missing_message_type() {
        let options = Options::parse(&[50, 4, 10, 0, 0, 7, 255]).unwrap();
        assert!(matches!(
            options.message_type(),
            Err(Error::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_parameter_request_list_absent_is_empty() {
        let options = Options::parse(&[53, 1, 1, 255]).unwrap();
        assert!(options.parameter_request_list().is_empty());
    }

    #[test]
    fn test_encode_appends_end() {
        let mut options = Options::new();
        options.push(DhcpOption::MessageType(MessageType::Offer));
        options.push(DhcpOption::LeaseTime(3600));

        let mut buffer = Vec::new();
        options.encode_into(&mut buffer);
        assert_eq!(buffer, vec![53, 1, 2, 51, 4, 0, 0, 0x0e, 0x10, 255]);
    }

    #[test]
    fn test_build_offer_reply() {
        let options = Options::build_reply(
            MessageType::Offer,
            MessageType::Discover,
            &identity(),
            &settings(),
            &[1, 3, 6, 15, 42],
        );

        assert_eq!(codes(&options), vec![53, 54, 51, 58, 59, 1, 3, 15]);
        assert_eq!(options.get(54), Some(&[192u8, 168, 1, 1][..]));
        assert_eq!(options.get(51), Some(&7200u32.to_be_bytes()[..]));
        assert_eq!(options.get(58), options.get(51));
        assert_eq!(options.get(59), options.get(51));
        assert_eq!(options.get(1), Some(&[255u8, 255, 255, 0][..]));
        assert_eq!(options.get(3), Some(&[192u8, 168, 1, 254][..]));
        assert_eq!(options.get(15), Some(&b"lab.local"[..]));
    }

    #[test]
    fn test_build_ack_for_request_carries_lease() {
        let options = Options::build_reply(
            MessageType::Ack,
            MessageType::Request,
            &identity(),
            &settings(),
            &[],
        );
        assert_eq!(codes(&options), vec![53, 54, 51, 58, 59]);
    }

    #[test]
    fn test_build_ack_for_inform_omits_lease() {
        let options = Options::build_reply(
            MessageType::Ack,
            MessageType::Inform,
            &identity(),
            &settings(),
            &[1],
        );
        assert_eq!(codes(&options), vec![53, 54, 1]);
    }

    #[test]
    fn test_build_nak_is_bare() {
        let options = Options::build_reply(
            MessageType::Nak,
            MessageType::Request,
            &identity(),
            &settings(),
            &[1, 3],
        );
        assert_eq!(codes(&options), vec![53]);
        assert_eq!(options.message_type().unwrap(), MessageType::Nak);
    }

    #[test]
    fn test_domain_name_falls_back_to_server_name() {
        let settings = ServerSettings {
            domain_name: None,
            server_name: Some("dhcp-host".to_string()),
            ..settings()
        };
        let options = Options::build_reply(
            MessageType::Offer,
            MessageType::Discover,
            &identity(),
            &settings,
            &[15],
        );
        assert_eq!(options.get(15), Some(&b"dhcp-host"[..]));
    }

    #[test]
    fn test_message_type_display() {
        assert_eq!(format!("{}", MessageType::Discover), "DHCPDISCOVER");
        assert_eq!(format!("{}", MessageType::Offer), "DHCPOFFER");
        assert_eq!(format!("{}", MessageType::Request), "DHCPREQUEST");
        assert_eq!(format!("{}", MessageType::Decline), "DHCPDECLINE");
        assert_eq!(format!("{}", MessageType::Ack), "DHCPACK");
        assert_eq!(format!("{}", MessageType::Nak), "DHCPNAK");
        assert_eq!(format!("{}", MessageType::Release), "DHCPRELEASE");
        assert_eq!(format!("{}", MessageType::Inform), "DHCPINFORM");
    }
}
