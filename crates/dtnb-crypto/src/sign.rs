//! Ed25519 message signing and verification.
//!
//! Two representations are produced:
//! - the *combined* signed message, `signature || message`, hex-encoded;
//! - the *detached* signature, which is always the first 128 hex characters
//!   of the combined form. It is taken from the combined form rather than
//!   computed separately so the two can never disagree.
//!
//! Verification is a predicate. Malformed hex, wrong lengths, unknown keys
//! and bad signatures all answer `false` (or `None`), never an error.

use std::fmt;

use ed25519_dalek::{Verifier, VerifyingKey};

use crate::codec;
use crate::error::Result;
use crate::wallet::{KeyPair, PublicKey};

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;
/// Length of a hex-encoded signature.
pub const SIGNATURE_HEX_LEN: usize = SIGNATURE_LEN * 2;

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub fn from_array(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Fails with [`crate::WalletError::InvalidInputLength`] unless `bytes` is 64 long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        codec::to_array(bytes, "signature").map(Self)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        codec::from_hex_array(hex, "signature").map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        codec::to_hex(self.0)
    }

    /// Whether this signature was made over `message` by the secret key
    /// behind `public_key`.
    pub fn verify(&self, public_key: &PublicKey, message: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&self.0);
        verifying_key.verify(message, &signature).is_ok()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Sign `message` and return `signature || message` as hex.
///
/// The output is `128 + 2 * message.len()` characters long.
pub fn sign_message(message: &str, key: &KeyPair) -> String {
    let message = codec::text_to_bytes(message);
    let signature = key.sign_bytes(message);

    let mut combined = Vec::with_capacity(SIGNATURE_LEN + message.len());
    combined.extend_from_slice(signature.as_bytes());
    combined.extend_from_slice(message);
    codec::to_hex(combined)
}

/// [`sign_message`] keyed by a hex-encoded 32-byte seed.
pub fn sign_message_hex(message: &str, secret_hex: &str) -> Result<String> {
    let key = KeyPair::from_seed_hex(secret_hex)?;
    Ok(sign_message(message, &key))
}

/// Detached signature of `message` as 128 hex characters.
pub fn create_signature(message: &str, key: &KeyPair) -> String {
    let mut signed = sign_message(message, key);
    signed.truncate(SIGNATURE_HEX_LEN);
    signed
}

/// [`create_signature`] keyed by a hex-encoded 32-byte seed.
pub fn create_signature_hex(message: &str, secret_hex: &str) -> Result<String> {
    let key = KeyPair::from_seed_hex(secret_hex)?;
    Ok(create_signature(message, &key))
}

/// Check a hex signature over `message` against a hex public key.
///
/// Only the first 128 characters of `signature` are used, so a combined
/// signed message for the same text verifies as well.
pub fn verify_signature(signature: &str, message: &str, public_key: &str) -> bool {
    let prefix = signature.get(..SIGNATURE_HEX_LEN).unwrap_or(signature);
    let (Ok(signature), Ok(public_key)) = (Signature::from_hex(prefix), PublicKey::from_hex(public_key))
    else {
        return false;
    };
    signature.verify(&public_key, codec::text_to_bytes(message))
}

/// Open a combined signed message and return the text it carries.
///
/// Returns `None` if the value is malformed, tampered with, or was not
/// signed by `public_key`. Only the combined format is understood.
pub fn read_signed_message(signed_message: &str, public_key: &str) -> Option<String> {
    let bytes = codec::from_hex(signed_message).ok()?;
    if bytes.len() < SIGNATURE_LEN {
        return None;
    }
    let (signature, message) = bytes.split_at(SIGNATURE_LEN);
    let signature = Signature::from_bytes(signature).ok()?;
    let public_key = PublicKey::from_hex(public_key).ok()?;

    signature
        .verify(&public_key, message)
        .then(|| codec::bytes_to_text(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;

    const MESSAGE: &str = "HELLO, WORLD!";
    const SECRET: &str = "705a3b36b44c2e95eebba870dc6fe5280c5c72783e2fe9449ebb73556faec57e";
    const PUBLIC: &str = "a5f0766103d33981ca0e90179fbd7ece2c9e76e0ea5d99ebb86cb80ff3c99ab9";
    const SIGNATURE: &str = "bda5c7af7d0992837d73e3cafea46e4b0879cd5445d0909060a20d81aadbd730b0a24f8b503646dd601a30b8d4a67c15ad44d97f4228347c10713bb95fe3e309";
    const SIGNED_MESSAGE: &str = "bda5c7af7d0992837d73e3cafea46e4b0879cd5445d0909060a20d81aadbd730b0a24f8b503646dd601a30b8d4a67c15ad44d97f4228347c10713bb95fe3e30948454c4c4f2c20574f524c4421";

    #[test]
    fn test_sign_message() {
        let signed = sign_message_hex(MESSAGE, SECRET).unwrap();
        assert_eq!(signed, SIGNED_MESSAGE);
        assert_eq!(&signed[..SIGNATURE_HEX_LEN], SIGNATURE);
        assert_eq!(signed.len(), SIGNATURE_HEX_LEN + 2 * MESSAGE.len());
    }

    #[test]
    fn test_create_signature() {
        assert_eq!(create_signature_hex(MESSAGE, SECRET).unwrap(), SIGNATURE);

        let key = KeyPair::from_seed_hex(SECRET).unwrap();
        assert_eq!(create_signature(MESSAGE, &key), SIGNATURE);
        assert_eq!(key.sign_bytes(MESSAGE.as_bytes()).to_hex(), SIGNATURE);
    }

    #[test]
    fn test_signing_data() {
        let pairs = [
            (
                "aa1ec5983b73d4870721d51a8c6a8fd27982029c0c7fee40a5d25d72861a48a9",
                "836df0c9174558bfe39e0051cbe7310cca3c51f8d1e7ba36bef297d6d3a6e58c1079d753901316e49dbae3715191c2b0fc7713bbba6d590fec14fb0f9e8f110a",
            ),
            (
                "0f6af6c4bd20f06cb0146b8344c75bceae3405497415d7261f615bcf48f633de",
                "fcb5092b7850d83e9d55123b198128b3df5e4181d4cfffb9ab3109ce7c134cbdb63ee2bd93b50a2417df1bb2178d2c37bbad18d02f68589a22ecfea90f1d3f04",
            ),
        ];

        for (secret, expected) in pairs {
            assert_eq!(create_signature_hex(MESSAGE, secret).unwrap(), expected);
        }
    }

    #[test]
    fn test_sign_rejects_bad_seed() {
        assert!(matches!(
            sign_message_hex(MESSAGE, "abcd"),
            Err(WalletError::InvalidInputLength { what: "seed", .. })
        ));
        assert_eq!(create_signature_hex(MESSAGE, "xyz!"), Err(WalletError::InvalidHex));
    }

    #[test]
    fn test_verify_signature() {
        assert!(verify_signature(SIGNATURE, MESSAGE, PUBLIC));
        assert!(!verify_signature(SIGNATURE, MESSAGE, SECRET));
        assert!(!verify_signature("signature", MESSAGE, PUBLIC));
        assert!(!verify_signature(SIGNATURE, "message", PUBLIC));
        assert!(!verify_signature(SIGNATURE, MESSAGE, "not a key"));
        assert!(!verify_signature("", MESSAGE, PUBLIC));
    }

    #[test]
    fn test_verify_accepts_combined_message() {
        assert!(verify_signature(SIGNED_MESSAGE, MESSAGE, PUBLIC));
    }

    #[test]
    fn test_verify_multibyte_input_does_not_panic() {
        let weird = "é".repeat(100);
        assert!(!verify_signature(&weird, MESSAGE, PUBLIC));
    }

    #[test]
    fn test_read_signed_message() {
        assert_eq!(read_signed_message(SIGNED_MESSAGE, PUBLIC).as_deref(), Some(MESSAGE));
    }

    #[test]
    fn test_read_signed_message_rejects_tampering() {
        // flip the last message byte: '!' (0x21) -> '"' (0x22)
        let mut tampered = SIGNED_MESSAGE.to_string();
        tampered.replace_range(tampered.len() - 2.., "22");
        assert_eq!(read_signed_message(&tampered, PUBLIC), None);

        let other = KeyPair::generate().unwrap();
        assert_eq!(read_signed_message(SIGNED_MESSAGE, &other.public_key_hex()), None);
        assert_eq!(read_signed_message(SIGNATURE, "zz"), None);
        assert_eq!(read_signed_message("abcd", PUBLIC), None);
    }

    #[test]
    fn test_read_detached_signature_alone_fails() {
        // a bare signature is a combined message over the empty string
        assert_eq!(read_signed_message(SIGNATURE, PUBLIC), None);
    }

    #[test]
    fn test_empty_message() {
        let key = KeyPair::generate().unwrap();
        let signed = sign_message("", &key);
        assert_eq!(signed.len(), SIGNATURE_HEX_LEN);
        assert_eq!(read_signed_message(&signed, &key.public_key_hex()).as_deref(), Some(""));
    }

    #[test]
    fn test_signature_from_bytes_length() {
        assert!(Signature::from_bytes(&[0u8; 64]).is_ok());
        assert!(matches!(
            Signature::from_bytes(&[0u8; 63]),
            Err(WalletError::InvalidInputLength { expected: 64, got: 63, .. })
        ));
    }
}
