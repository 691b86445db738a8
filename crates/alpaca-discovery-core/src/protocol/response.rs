//! Discovery response parsing and building.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MalformedResponse;
use crate::types::{AlpacaPort, DiscoveryResponse};

const ALPACA_PORT_FIELD: &str = "AlpacaPort";

/// Body a device sends back to a discovery request.
#[derive(Debug, Serialize, Deserialize)]
struct DiscoveryReply {
    #[serde(rename = "AlpacaPort")]
    alpaca_port: u16,
}

/// Parse a response datagram received from `from`.
///
/// The payload must be UTF-8 text holding a JSON object. A missing or
/// out-of-range `AlpacaPort` is reported as [`AlpacaPort::Unknown`]; every
/// other field is ignored.
pub fn parse_discovery_response(
    data: &[u8],
    from: SocketAddr,
) -> Result<DiscoveryResponse, MalformedResponse> {
    let text = std::str::from_utf8(data)?;
    let json: Value = serde_json::from_str(text)?;

    let body = match json {
        Value::Object(map) => map,
        other => return Err(MalformedResponse::NotAnObject(json_kind(&other))),
    };

    let alpaca_port = body
        .get(ALPACA_PORT_FIELD)
        .and_then(Value::as_u64)
        .and_then(|port| u16::try_from(port).ok())
        .map(AlpacaPort::Known)
        .unwrap_or(AlpacaPort::Unknown);

    Ok(DiscoveryResponse {
        ip_address: from.ip().to_string(),
        port: from.port(),
        alpaca_port,
    })
}

/// Build the JSON reply a device sends for its Alpaca API port.
pub fn discovery_reply(alpaca_port: u16) -> Vec<u8> {
    // Serializing a struct of one integer cannot fail.
    serde_json::to_vec(&DiscoveryReply { alpaca_port }).unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SocketAddr {
        "10.0.0.5:32227".parse().unwrap()
    }

    #[test]
    fn test_parse_well_formed_response() {
        let response = parse_discovery_response(br#"{"AlpacaPort": 11111}"#, sender()).unwrap();
        assert_eq!(
            response,
            DiscoveryResponse {
                ip_address: "10.0.0.5".to_string(),
                port: 32227,
                alpaca_port: AlpacaPort::Known(11111),
            }
        );
    }

    #[test]
    fn test_address_comes_from_sender_not_body() {
        let data = br#"{"AlpacaPort": 80, "IPAddress": "1.2.3.4", "Port": 1}"#;
        let response = parse_discovery_response(data, sender()).unwrap();
        assert_eq!(response.ip_address, "10.0.0.5");
        assert_eq!(response.port, 32227);
        assert_eq!(response.alpaca_port, AlpacaPort::Known(80));
    }

    #[test]
    fn test_missing_alpaca_port_is_unknown() {
        let response = parse_discovery_response(br#"{"Name": "dome"}"#, sender()).unwrap();
        assert_eq!(response.alpaca_port, AlpacaPort::Unknown);
        assert_eq!(response.alpaca_port.to_string(), "Unknown");
    }

    #[test]
    fn test_non_port_alpaca_port_is_unknown() {
        let response = parse_discovery_response(br#"{"AlpacaPort": "eighty"}"#, sender()).unwrap();
        assert_eq!(response.alpaca_port, AlpacaPort::Unknown);

        let response = parse_discovery_response(br#"{"AlpacaPort": 70000}"#, sender()).unwrap();
        assert_eq!(response.alpaca_port, AlpacaPort::Unknown);
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_discovery_response(b"{\"AlpacaPort\": ", sender());
        assert!(matches!(result, Err(MalformedResponse::InvalidJson(_))));
    }

    #[test]
    fn test_invalid_utf8() {
        let result = parse_discovery_response(&[0x7b, 0xff, 0xfe, 0x7d], sender());
        assert!(matches!(result, Err(MalformedResponse::InvalidUtf8(_))));
    }

    #[test]
    fn test_json_that_is_not_an_object() {
        let result = parse_discovery_response(b"[11111]", sender());
        assert!(matches!(result, Err(MalformedResponse::NotAnObject("array"))));
    }

    #[test]
    fn test_discovery_reply_body() {
        assert_eq!(discovery_reply(11111), br#"{"AlpacaPort":11111}"#.to_vec());

        let parsed = parse_discovery_response(&discovery_reply(4567), sender()).unwrap();
        assert_eq!(parsed.alpaca_port, AlpacaPort::Known(4567));
    }
}
