//! CLI argument definitions using clap.

use std::time::Duration;

use alpaca_discovery_core::discovery::{DiscoveryOptions, ListenMode, DEFAULT_BROADCAST_ADDRESS};
use alpaca_discovery_core::protocol::DISCOVERY_PORT;
use clap::Parser;

const EXAMPLES: &str = "\
Examples:
  # Discover devices on local network
  alpaca-discovery-cli

  # Use specific broadcast address
  alpaca-discovery-cli --broadcast-address 192.168.1.255

  # Wait longer for responses
  alpaca-discovery-cli --timeout 10";

/// Alpaca Discovery CLI - probe the network for ASCOM Alpaca devices
#[derive(Parser, Debug)]
#[command(name = "alpaca-discovery-cli")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Broadcast address to send discovery to
    #[arg(long, default_value = DEFAULT_BROADCAST_ADDRESS)]
    pub broadcast_address: String,

    /// Timeout in seconds to wait for responses
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// UDP port devices listen on for discovery
    #[arg(long, default_value_t = DISCOVERY_PORT)]
    pub port: u16,

    /// Keep listening for the whole timeout instead of stopping at the first silent gap
    #[arg(long)]
    pub full_window: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            broadcast_address: self.broadcast_address.clone(),
            port: self.port,
            timeout: Duration::from_secs(self.timeout),
            listen_mode: if self.full_window {
                ListenMode::UntilDeadline
            } else {
                ListenMode::FirstSilence
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["alpaca-discovery-cli"]).unwrap();
        let options = cli.discovery_options();

        assert_eq!(options.broadcast_address, "255.255.255.255");
        assert_eq!(options.port, 32227);
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(options.listen_mode, ListenMode::FirstSilence);
        assert!(!cli.json);
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::try_parse_from([
            "alpaca-discovery-cli",
            "--broadcast-address",
            "192.168.1.255",
            "--timeout",
            "10",
            "--full-window",
        ])
        .unwrap();
        let options = cli.discovery_options();

        assert_eq!(options.broadcast_address, "192.168.1.255");
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.listen_mode, ListenMode::UntilDeadline);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["alpaca-discovery-cli", "--timeout", "0"]).is_err());
    }
}
