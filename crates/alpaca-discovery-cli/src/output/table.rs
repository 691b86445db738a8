//! Human-readable output for CLI.

use std::net::SocketAddr;

use alpaca_discovery_core::discovery::{DiscoveryOptions, ListenMode};
use alpaca_discovery_core::error::{DiscoveryError, MalformedResponse};
use alpaca_discovery_core::protocol::DISCOVERY_MESSAGE;
use alpaca_discovery_core::types::DiscoveryResponse;
use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use super::OutputFormatter;

const RULE_WIDTH: usize = 60;

const TROUBLESHOOTING: &[&str] = &[
    "Ensure the device is connected and running",
    "Check that UDP port 32227 is not blocked by firewall",
    "Verify you're on the same network as the device",
    "Try using a specific broadcast address (e.g., 192.168.1.255)",
    "Check the device's serial output for errors",
];

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn rule() -> String {
        "=".repeat(RULE_WIDTH)
    }

    fn device_table(devices: &[DiscoveryResponse]) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "IP", "Response Port", "Alpaca Port"]);

        for (i, device) in devices.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&device.ip_address),
                Cell::new(device.port),
                Cell::new(device.alpaca_port),
            ]);
        }

        table
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_start(&self, options: &DiscoveryOptions) -> Option<String> {
        let wait = match options.listen_mode {
            ListenMode::FirstSilence => format!("Waiting {} seconds for responses...", options.timeout.as_secs()),
            ListenMode::UntilDeadline => {
                format!("Listening for the full {} seconds...", options.timeout.as_secs())
            }
        };

        let lines = [
            Self::rule(),
            "ASCOM Alpaca Discovery".bold().to_string(),
            Self::rule(),
            String::new(),
            format!(
                "Sending Alpaca discovery broadcast to {}:{}",
                options.broadcast_address, options.port
            ),
            format!("Message: {}", String::from_utf8_lossy(DISCOVERY_MESSAGE)),
            wait,
        ];

        Some(format!("{}\n", lines.join("\n")))
    }

    fn format_response(&self, response: &DiscoveryResponse, raw: &[u8]) -> Option<String> {
        let lines = [
            format!("{} Found Alpaca device at {}", "✓".green(), response.ip_address),
            format!("  Response Port: {}", response.port),
            format!("  Alpaca API Port: {}", response.alpaca_port),
            format!("  Raw Response: {}", String::from_utf8_lossy(raw)),
        ];

        Some(format!("{}\n", lines.join("\n")))
    }

    fn format_malformed(&self, from: SocketAddr, raw: &[u8], error: &MalformedResponse) -> String {
        format!(
            "{} Received invalid JSON from {}: {}\n  Error: {}\n",
            "⚠".yellow(),
            from.ip(),
            String::from_utf8_lossy(raw),
            error
        )
    }

    fn format_error(&self, error: &DiscoveryError) -> String {
        format!("{} Error during discovery: {}", "✗".red(), error)
    }

    fn format_devices(&self, devices: &[DiscoveryResponse]) -> String {
        let mut lines = vec![
            Self::rule(),
            format!("Discovery complete. Found {} device(s).", devices.len()),
            Self::rule(),
        ];

        if devices.is_empty() {
            lines.push(String::new());
            lines.push(format!("{} No Alpaca devices found on the network.", "⚠".yellow()));
            lines.push(String::new());
            lines.push("Troubleshooting:".to_string());
            for (i, hint) in TROUBLESHOOTING.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, hint));
            }
            return lines.join("\n");
        }

        lines.push(String::new());
        lines.push("Summary of discovered devices:".bold().to_string());
        lines.push(Self::device_table(devices).to_string());

        for (i, device) in devices.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("{}. Device at {}", i + 1, device.ip_address));
            lines.push(format!("   Alpaca API: {}", device.api_url()));
            lines.push(format!("   Management API: {}", device.api_versions_url()));
            lines.push(format!("   Configured Devices: {}", device.configured_devices_url()));
        }

        lines.join("\n")
    }
}
