//! Error types for the DHCP server.
//!
//! All fallible operations in this crate return [`Result<T>`], which uses
//! the [`Error`] enum for error variants.

/// Errors that can occur during DHCP server operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File system or network I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (settings file).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed DHCP packet received.
    ///
    /// The datagram is shorter than the 240-byte fixed header, carries a bad
    /// magic cookie, or lacks the DHCP Message Type option.
    #[error("Malformed DHCP packet: {0}")]
    MalformedPacket(String),

    /// An option's declared length overruns the buffer, or a typed option
    /// carries a value of the wrong size.
    #[error("Malformed DHCP option: {0}")]
    MalformedOption(String),

    /// A well-formed packet that the server cannot act on: an unrecognized or
    /// server-only message type, or a REQUEST matching no client state.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Every pool entry is allocated or authorized to another client.
    #[error("No available IP addresses in pool")]
    PoolExhausted,

    /// Invalid server settings.
    ///
    /// Returned by [`ServerSettings::validate`](crate::ServerSettings::validate)
    /// and therefore by [`DhcpServer::new`](crate::DhcpServer::new). The server
    /// must not start.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Socket creation or configuration error.
    ///
    /// Typically occurs when binding to port 67 without administrator privileges.
    #[error("Socket error: {0}")]
    Socket(String),
}

/// A specialized Result type for DHCP operations.
pub type Result<T> = std::result::Result<T, Error>;
