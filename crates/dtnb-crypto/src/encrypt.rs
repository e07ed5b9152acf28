//! Authenticated peer-to-peer encryption.
//!
//! Both key pairs are converted to X25519 and the message is sealed with
//! NaCl `crypto_box` (X25519 + XSalsa20-Poly1305). The payload is the hex of
//! `tag || ciphertext` behind a literal `#` marker; the nonce travels
//! separately.
//!
//! Because the box key comes from ECDH, the sender (own secret, receiver
//! public) and the receiver (own secret, sender public) derive the same key
//! and either can open the payload.

use std::fmt;

use crypto_box::aead::{generic_array::GenericArray, Aead};
use crypto_box::SalsaBox;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::codec;
use crate::convert;
use crate::error::{Result, WalletError};
use crate::wallet::{KeyPair, PublicKey};

/// Length of a box nonce.
pub const NONCE_LEN: usize = 24;

/// Marker in front of every encrypted payload.
pub const PAYLOAD_MARKER: char = '#';

/// A 24-byte box nonce.
///
/// A nonce must never be used twice with the same pair of keys for
/// different messages.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Draw a fresh nonce from the OS random source.
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; NONCE_LEN];
        getrandom::getrandom(&mut bytes).map_err(|_| WalletError::Rng)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        codec::to_array(bytes, "nonce").map(Self)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        codec::from_hex_array(hex, "nonce").map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        codec::to_hex(self.0)
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", self.to_hex())
    }
}

/// An encrypted payload together with the nonce that sealed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedMessage {
    /// Hex-encoded 24-byte nonce.
    pub nonce: String,
    /// `#` followed by hex of `tag || ciphertext`.
    pub encrypted_message: String,
}

impl EncryptedMessage {
    pub fn parse_nonce(&self) -> Result<Nonce> {
        Nonce::from_hex(&self.nonce)
    }
}

fn salsa_box(keys: &KeyPair, peer: &PublicKey) -> Result<SalsaBox> {
    let peer_dh = convert::to_x25519_public(peer).map_err(|_| WalletError::ConversionFailure {
        key: "peer public key",
    })?;
    let own_dh = Zeroizing::new(convert::dh_secret(keys).to_bytes());

    let secret = crypto_box::SecretKey::from(*own_dh);
    let public = crypto_box::PublicKey::from(peer_dh.to_bytes());
    Ok(SalsaBox::new(&public, &secret))
}

/// Encrypt `message` from `keys` to `peer`.
///
/// A random nonce is drawn when `nonce` is `None`. Fails with
/// [`WalletError::ConversionFailure`] if the peer key is not a valid curve
/// point or has small order.
pub fn encrypt_message(
    keys: &KeyPair,
    peer: &PublicKey,
    message: &str,
    nonce: Option<Nonce>,
) -> Result<EncryptedMessage> {
    let cipher = salsa_box(keys, peer)?;
    let nonce = match nonce {
        Some(nonce) => nonce,
        None => Nonce::random()?,
    };

    let ciphertext = cipher
        .encrypt(
            GenericArray::from_slice(nonce.as_bytes()),
            codec::text_to_bytes(message),
        )
        .map_err(|_| WalletError::EncryptionFailure)?;

    let mut encrypted_message = String::with_capacity(1 + 2 * ciphertext.len());
    encrypted_message.push(PAYLOAD_MARKER);
    encrypted_message.push_str(&codec::to_hex(&ciphertext));

    debug!(peer = %peer, bytes = ciphertext.len(), "encrypted message");
    Ok(EncryptedMessage {
        nonce: nonce.to_hex(),
        encrypted_message,
    })
}

/// Decrypt a payload exchanged between `keys` and `peer`.
///
/// The leading `#` is optional. Fails with [`WalletError::DecryptionFailure`]
/// when the payload does not authenticate under the derived key and `nonce`.
pub fn decrypt_message(
    keys: &KeyPair,
    peer: &PublicKey,
    encrypted_message: &str,
    nonce: &Nonce,
) -> Result<String> {
    let payload = encrypted_message
        .strip_prefix(PAYLOAD_MARKER)
        .unwrap_or(encrypted_message);
    let ciphertext = codec::from_hex(payload)?;
    let cipher = salsa_box(keys, peer)?;

    let plaintext = cipher
        .decrypt(GenericArray::from_slice(nonce.as_bytes()), ciphertext.as_slice())
        .map(Zeroizing::new)
        .map_err(|_| {
            trace!(peer = %peer, "box did not authenticate");
            WalletError::DecryptionFailure
        })?;

    debug!(peer = %peer, bytes = ciphertext.len(), "decrypted message");
    Ok(codec::bytes_to_text(&plaintext))
}
