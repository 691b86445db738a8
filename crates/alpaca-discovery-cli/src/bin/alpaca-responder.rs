//! Answers Alpaca discovery requests the way a device does.
//!
//! Useful for checking the probe and the network path without hardware.

use std::net::{Ipv4Addr, SocketAddr};

use alpaca_discovery_core::protocol::DISCOVERY_PORT;
use alpaca_discovery_core::DiscoveryResponder;
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "alpaca-responder")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on for discovery requests
    #[arg(long, default_value_t = SocketAddr::from((Ipv4Addr::UNSPECIFIED, DISCOVERY_PORT)))]
    bind: SocketAddr,

    /// Alpaca API port to advertise
    #[arg(long, default_value_t = 80)]
    alpaca_port: u16,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .format_target(false)
        .init();

    let responder = DiscoveryResponder::bind(args.bind, args.alpaca_port)?;
    responder.run().await;

    Ok(())
}
