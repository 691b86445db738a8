//! Output formatting for CLI results.

pub mod json;
pub mod table;

use std::net::SocketAddr;

use alpaca_discovery_core::discovery::DiscoveryOptions;
use alpaca_discovery_core::error::{DiscoveryError, MalformedResponse};
use alpaca_discovery_core::types::DiscoveryResponse;

pub use json::JsonOutput;
pub use table::TableOutput;

/// Output formatter trait
///
/// Methods returning `None` print nothing for that event.
pub trait OutputFormatter {
    /// Format the banner printed before the request is sent
    fn format_start(&self, options: &DiscoveryOptions) -> Option<String>;

    /// Format a single response as it arrives
    fn format_response(&self, response: &DiscoveryResponse, raw: &[u8]) -> Option<String>;

    /// Format a datagram that could not be parsed
    fn format_malformed(&self, from: SocketAddr, raw: &[u8], error: &MalformedResponse) -> String;

    /// Format a socket failure that ended discovery
    fn format_error(&self, error: &DiscoveryError) -> String;

    /// Format the final device list
    fn format_devices(&self, devices: &[DiscoveryResponse]) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
