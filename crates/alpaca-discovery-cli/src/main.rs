//! Alpaca Discovery CLI - probe the local network for ASCOM Alpaca devices.
//!
//! Sends one `alpacadiscovery1` UDP broadcast, prints every reply received
//! within the timeout, and exits non-zero when nothing answered.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use log::LevelFilter;

use cli::Cli;
use error::{exit_codes, CliError};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            if let Some(message) = e.report() {
                eprintln!("{}", message);
            }
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    commands::run_discover(&cli).await
}

/// Log to stderr; the level comes from `--verbose` only.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}
