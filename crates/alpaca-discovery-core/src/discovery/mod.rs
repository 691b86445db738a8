//! UDP discovery prober.
//!
//! Broadcasts a single Alpaca discovery request and collects the replies.

pub mod service;

pub use service::{
    create_broadcast_socket, discover, DiscoveryEvent, DiscoveryOptions, DiscoveryService,
    ListenMode, DEFAULT_BROADCAST_ADDRESS, DEFAULT_TIMEOUT,
};
