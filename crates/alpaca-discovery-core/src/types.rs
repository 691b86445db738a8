//! Type definitions for discovered Alpaca devices.

use std::fmt;

use serde::{Serialize, Serializer};

/// The Alpaca API port advertised by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlpacaPort {
    Known(u16),
    /// The response carried no usable `AlpacaPort` field.
    Unknown,
}

impl AlpacaPort {
    pub fn known(&self) -> Option<u16> {
        match self {
            AlpacaPort::Known(port) => Some(*port),
            AlpacaPort::Unknown => None,
        }
    }
}

impl fmt::Display for AlpacaPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlpacaPort::Known(port) => write!(f, "{}", port),
            AlpacaPort::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for AlpacaPort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AlpacaPort::Known(port) => serializer.serialize_u16(*port),
            AlpacaPort::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

/// One reply to a discovery broadcast.
///
/// Address and port come from the datagram's source, not from the JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResponse {
    /// Sender IP address
    pub ip_address: String,
    /// Sender UDP port the response came from
    pub port: u16,
    /// Port of the device's Alpaca HTTP API
    pub alpaca_port: AlpacaPort,
}

impl DiscoveryResponse {
    /// Base URL of the device's Alpaca API.
    pub fn api_url(&self) -> String {
        format!("http://{}:{}/", self.ip_address, self.alpaca_port)
    }

    pub fn api_versions_url(&self) -> String {
        format!("{}management/apiversions", self.api_url())
    }

    pub fn configured_devices_url(&self) -> String {
        format!("{}management/v1/configureddevices", self.api_url())
    }
}

/// Responses in arrival order. A device that replies twice appears twice.
pub type DeviceList = Vec<DiscoveryResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    fn response(alpaca_port: AlpacaPort) -> DiscoveryResponse {
        DiscoveryResponse {
            ip_address: "10.0.0.5".to_string(),
            port: 32227,
            alpaca_port,
        }
    }

    #[test]
    fn test_urls() {
        let r = response(AlpacaPort::Known(11111));
        assert_eq!(r.api_url(), "http://10.0.0.5:11111/");
        assert_eq!(r.api_versions_url(), "http://10.0.0.5:11111/management/apiversions");
        assert_eq!(
            r.configured_devices_url(),
            "http://10.0.0.5:11111/management/v1/configureddevices"
        );
    }

    #[test]
    fn test_unknown_port_in_url() {
        let r = response(AlpacaPort::Unknown);
        assert_eq!(r.api_url(), "http://10.0.0.5:Unknown/");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(response(AlpacaPort::Known(11111))).unwrap();
        assert_eq!(json["ipAddress"], "10.0.0.5");
        assert_eq!(json["port"], 32227);
        assert_eq!(json["alpacaPort"], 11111);

        let json = serde_json::to_value(response(AlpacaPort::Unknown)).unwrap();
        assert_eq!(json["alpacaPort"], "Unknown");
    }
}
