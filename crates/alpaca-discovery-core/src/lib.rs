//! Shared core library for ASCOM Alpaca UDP discovery.
//!
//! Holds the wire protocol, the discovery prober used by the CLI, and the
//! device-side responder.

pub mod discovery;
pub mod error;
pub mod protocol;
pub mod responder;
pub mod types;

pub use discovery::{discover, DiscoveryEvent, DiscoveryOptions, DiscoveryService, ListenMode};
pub use error::{DiscoveryError, MalformedResponse};
pub use responder::DiscoveryResponder;
pub use types::{AlpacaPort, DeviceList, DiscoveryResponse};
