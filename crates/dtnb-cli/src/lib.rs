//! dtnb command-line front end
//!
//! Thin command layer over `dtnb-crypto`:
//! - creating and recovering account key pairs
//! - generating and checking mnemonic phrases
//! - signing and verifying messages
//! - encrypting and decrypting messages between two accounts
//!
//! Nothing is stored and nothing is sent over the network. Every command
//! transforms the values it is given and prints the result.

pub mod cli;
pub mod config;
pub mod output;

#[cfg(test)]
mod proptests;

use dtnb_crypto::WalletError;

pub use cli::Cli;
pub use config::{CliOverrides, Config, ConfigError};
pub use output::{CommandOutput, JsonResponse, OutputFormat, OutputFormatter};

/// Exit codes for CLI operations
///
/// - 0: Success - operation completed successfully
/// - 1: General error - unspecified error occurred
/// - 2: Verification failed - a signature, key pair or ciphertext did not check out
/// - 5: Invalid input - malformed keys, hex, nonces or mnemonic phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully (exit code 0)
    Success = 0,
    /// General error (exit code 1)
    GeneralError = 1,
    /// Verification failed (exit code 2)
    VerificationFailed = 2,
    /// Invalid input provided (exit code 5)
    InvalidInput = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Convert to process exit code
    pub fn to_exit_code(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self as u8)
    }

    /// Exit code for a failed command.
    pub fn from_error(error: &anyhow::Error) -> Self {
        if let Some(ConfigError::ValidationError(_)) = error.downcast_ref::<ConfigError>() {
            return ExitCode::InvalidInput;
        }
        match error.downcast_ref::<WalletError>() {
            Some(WalletError::DecryptionFailure) => ExitCode::VerificationFailed,
            Some(
                WalletError::InvalidHex
                | WalletError::InvalidInputLength { .. }
                | WalletError::InvalidMnemonic
                | WalletError::InvalidKeyPair
                | WalletError::ConversionFailure { .. },
            ) => ExitCode::InvalidInput,
            Some(_) | None => ExitCode::GeneralError,
        }
    }

    /// Get the exit code name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ExitCode::Success => "SUCCESS",
            ExitCode::GeneralError => "GENERAL_ERROR",
            ExitCode::VerificationFailed => "VERIFICATION_FAILED",
            ExitCode::InvalidInput => "INVALID_INPUT",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ExitCode::Success => "Operation completed successfully",
            ExitCode::GeneralError => "An unspecified error occurred",
            ExitCode::VerificationFailed => "Signature, key pair or ciphertext did not verify",
            ExitCode::InvalidInput => "Invalid arguments or data provided",
        }
    }
}
