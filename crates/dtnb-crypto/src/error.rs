//! Error types shared by every module of the crate.

use thiserror::Error;

/// Errors surfaced by key construction, conversion and encryption.
///
/// Signature checks never produce one of these: [`crate::verify_signature`]
/// answers `false` and [`crate::read_signed_message`] answers `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("invalid hex string")]
    InvalidHex,

    #[error("invalid {what} length: expected {expected} bytes, got {got}")]
    InvalidInputLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("the mnemonic phrase is not valid")]
    InvalidMnemonic,

    #[error("the public key does not belong to the secret key")]
    InvalidKeyPair,

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("the {key} could not be converted to x25519")]
    ConversionFailure { key: &'static str },

    #[error("encryption failed")]
    EncryptionFailure,

    #[error("error decrypting message")]
    DecryptionFailure,

    #[error("secure random source unavailable")]
    Rng,
}

pub type Result<T> = std::result::Result<T, WalletError>;
