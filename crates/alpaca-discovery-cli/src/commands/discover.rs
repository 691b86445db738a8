//! Discover command implementation.

use std::io::{self, Write};

use alpaca_discovery_core::discovery::{DiscoveryEvent, DiscoveryService};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{get_formatter, OutputFormatter};

/// Run the discover command
pub async fn run_discover(cli: &Cli) -> Result<(), CliError> {
    let formatter = get_formatter(cli.json);
    let options = cli.discovery_options();

    if let Some(banner) = formatter.format_start(&options) {
        println!("{}", banner);
    }

    let devices =
        DiscoveryService::discover_once(options, |event| report_event(formatter.as_ref(), event)).await;

    println!("{}", formatter.format_devices(&devices));
    io::stdout().flush()?;

    if devices.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}

/// Progress goes to stdout, diagnostics to stderr.
fn report_event(formatter: &dyn OutputFormatter, event: DiscoveryEvent<'_>) {
    match event {
        DiscoveryEvent::Response { response, raw } => {
            if let Some(report) = formatter.format_response(response, raw) {
                println!("{}", report);
            }
        }
        DiscoveryEvent::Malformed { from, raw, error } => {
            eprintln!("{}", formatter.format_malformed(from, raw, error));
        }
        DiscoveryEvent::Aborted { error } => {
            eprintln!("{}", formatter.format_error(error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tokio::net::UdpSocket;

    #[tokio::test]
    async fn test_silent_network_is_no_devices_found() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port().to_string();
        let cli = Cli::try_parse_from([
            "alpaca-discovery-cli",
            "--broadcast-address",
            "127.0.0.1",
            "--port",
            port.as_str(),
            "--timeout",
            "1",
            "--json",
        ])
        .unwrap();

        let result = run_discover(&cli).await;

        assert!(matches!(result, Err(CliError::NoDevicesFound)));
        assert_eq!(result.unwrap_err().exit_code(), 1);
    }

    #[tokio::test]
    async fn test_answering_device_succeeds() {
        let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = device.local_addr().unwrap().port().to_string();
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (_, requester) = device.recv_from(&mut buf).await.unwrap();
            device.send_to(br#"{"AlpacaPort": 11111}"#, requester).await.unwrap();
        });
        let cli = Cli::try_parse_from([
            "alpaca-discovery-cli",
            "--broadcast-address",
            "127.0.0.1",
            "--port",
            port.as_str(),
            "--timeout",
            "1",
        ])
        .unwrap();

        assert!(run_discover(&cli).await.is_ok());
    }
}
