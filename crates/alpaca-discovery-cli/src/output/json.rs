//! JSON-formatted output for CLI.

use std::net::SocketAddr;

use alpaca_discovery_core::discovery::DiscoveryOptions;
use alpaca_discovery_core::error::{DiscoveryError, MalformedResponse};
use alpaca_discovery_core::types::DiscoveryResponse;
use serde::Serialize;
use serde_json::json;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_start(&self, _options: &DiscoveryOptions) -> Option<String> {
        None
    }

    fn format_response(&self, _response: &DiscoveryResponse, _raw: &[u8]) -> Option<String> {
        None
    }

    fn format_malformed(&self, from: SocketAddr, raw: &[u8], error: &MalformedResponse) -> String {
        // Single line so stderr stays one record per packet
        json!({
            "warning": "invalid response",
            "from": from.ip().to_string(),
            "raw": String::from_utf8_lossy(raw),
            "error": error.to_string()
        })
        .to_string()
    }

    fn format_error(&self, error: &DiscoveryError) -> String {
        json!({ "error": error.to_string() }).to_string()
    }

    fn format_devices(&self, devices: &[DiscoveryResponse]) -> String {
        let output = json!({
            "devices": devices,
            "count": devices.len()
        });
        Self::to_json(&output)
    }
}
