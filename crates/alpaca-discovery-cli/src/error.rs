//! Error types for the Alpaca discovery CLI.

use thiserror::Error;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No devices found")]
    NoDevicesFound,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::NoDevicesFound => exit_codes::GENERAL_ERROR,
        }
    }

    /// Message for stderr, or `None` when the output already explained it
    pub fn report(&self) -> Option<String> {
        match self {
            // The summary or the JSON device list already says nothing was found
            CliError::NoDevicesFound => None,
            other => Some(format!("Error: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_devices_exit_code() {
        assert_eq!(CliError::NoDevicesFound.exit_code(), 1);
        assert_eq!(format!("{}", CliError::NoDevicesFound), "No devices found");
    }

    #[test]
    fn test_no_devices_is_not_reported_again() {
        assert_eq!(CliError::NoDevicesFound.report(), None);

        let err = CliError::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(err.report().unwrap().starts_with("Error: IO error"));
    }
}
