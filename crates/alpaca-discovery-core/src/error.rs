//! Error types for Alpaca discovery.

use std::net::SocketAddr;

use thiserror::Error;

/// Socket-level failures that abort a discovery attempt.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to set up discovery socket: {0}")]
    Socket(#[source] std::io::Error),

    #[error("Failed to resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to send discovery request to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to receive discovery response: {0}")]
    Receive(#[source] std::io::Error),
}

/// A datagram that could not be turned into a discovery response.
///
/// These are recoverable: the packet is reported and listening continues.
#[derive(Debug, Error)]
pub enum MalformedResponse {
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_error_display() {
        let err = DiscoveryError::Send {
            target: "255.255.255.255:32227".parse().unwrap(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let msg = format!("{}", err);
        assert!(msg.starts_with("Failed to send discovery request to 255.255.255.255:32227"));
    }

    #[test]
    fn test_discovery_error_keeps_source() {
        use std::error::Error as _;

        let err = DiscoveryError::Receive(std::io::Error::from(std::io::ErrorKind::ConnectionReset));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_malformed_not_an_object() {
        let err = MalformedResponse::NotAnObject("array");
        assert_eq!(format!("{}", err), "expected a JSON object, got array");
    }
}
