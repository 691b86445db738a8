//! Wire-level constants and parsing for the Alpaca discovery handshake.

pub mod response;

pub use response::{discovery_reply, parse_discovery_response};

/// UDP port Alpaca devices listen on for discovery requests
pub const DISCOVERY_PORT: u16 = 32227;

/// Discovery request payload, sent verbatim
pub const DISCOVERY_MESSAGE: &[u8] = b"alpacadiscovery1";

/// Largest response datagram read by the prober
pub const MAX_RESPONSE_SIZE: usize = 1024;

/// Largest request datagram read by the responder
pub const MAX_REQUEST_SIZE: usize = 255;
