#![forbid(unsafe_code)]

//! Cryptographic identity for a network account.
//!
//! A [`Wallet`] owns one Ed25519 key pair and uses it for two things:
//! signing messages, and authenticated peer-to-peer encryption (NaCl
//! `crypto_box`) after converting both sides' keys to X25519.
//!
//! Everything here is a pure in-memory transformation. Keys are never
//! persisted and nothing is sent anywhere.

pub mod codec;
pub mod convert;
pub mod encrypt;
pub mod error;
pub mod mnemonic;
pub mod sign;
pub mod utils;
pub mod wallet;

#[cfg(test)]
mod proptests;

pub use encrypt::{EncryptedMessage, Nonce};
pub use error::{Result, WalletError};
pub use mnemonic::{generate_mnemonic, validate_mnemonic, WordCount, DERIVATION_PATH};
pub use sign::{
    create_signature, create_signature_hex, read_signed_message, sign_message,
    sign_message_hex, verify_signature, Signature,
};
pub use wallet::{KeyPair, PublicKey, Wallet};
