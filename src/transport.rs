//! Transport descriptors (RFC 2326 §12.39).
//!
//! A [`Transport`] describes one side of a media delivery path. During
//! SETUP the client offers one and the server answers with its own:
//!
//! ```text
//! Client → Server:
//!   Transport: RTP/AVP;unicast;client_port=8000-8001
//!
//! Server → Client:
//!   Transport: RTP/AVP;unicast;client_port=8000-8001;server_port=5000-5001
//! ```
//!
//! The client states where it will listen, the server states where it will
//! send from. The two port pairs are independent values.
//! Header text encoding and decoding belongs to the protocol layer.

use std::fmt;
use std::net::IpAddr;

/// Inclusive port pair, e.g. RTP/RTCP `5000-5001`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

impl PortRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Whether no port has been assigned.
    pub fn is_unset(&self) -> bool {
        self.min == 0 && self.max == 0
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Transport protocol tag (first component of `RTP/AVP/UDP`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransProtocol {
    #[default]
    Unknown,
    Rtp,
}

/// Transport profile (second component of `RTP/AVP/UDP`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Unknown,
    /// Audio/video profile (RFC 3551).
    Avp,
    /// Secure audio/video profile (RFC 3711).
    Savp,
}

/// Lower-layer transport carrying the media.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LowerTransport {
    #[default]
    Unknown,
    Udp,
    UdpMulticast,
    /// Interleaved on the RTSP connection (RFC 2326 §10.12).
    Tcp,
}

/// Negotiated transport parameters for one media substream.
///
/// Built by the protocol layer from the client's `Transport` header, or by
/// [`SessionStream::set_transport`](crate::SessionStream::set_transport)
/// as the server's counter-offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transport {
    pub trans: TransProtocol,
    pub profile: Profile,
    pub lower_transport: LowerTransport,
    /// Multicast or redirect destination requested by the client.
    pub destination: Option<IpAddr>,
    /// Multicast time-to-live.
    pub ttl: u8,
    /// Channel pair for TCP interleaving.
    pub interleaved: PortRange,
    /// Ports the client receives RTP/RTCP on.
    pub client_port: PortRange,
    /// Ports the server sends RTP/RTCP from.
    pub server_port: PortRange,
}

impl Transport {
    /// Plain unicast `RTP/AVP` over UDP to the given client ports.
    pub fn rtp_avp_udp(client_port: PortRange) -> Self {
        Self {
            trans: TransProtocol::Rtp,
            profile: Profile::Avp,
            lower_transport: LowerTransport::Udp,
            client_port,
            ..Self::default()
        }
    }
}
