//! Ed25519 to X25519 key conversion.
//!
//! Maps signing keys (Edwards form) to Diffie-Hellman keys (Montgomery
//! form) so one key pair serves both signatures and key agreement.
//! Converted keys are recomputed on every call and never cached.

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha512};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Result, WalletError};
use crate::wallet::{KeyPair, PublicKey, SEED_LEN};

/// Convert an Ed25519 public key to its X25519 form, `u = (1 + y) / (1 - y)`.
///
/// Fails with [`WalletError::ConversionFailure`] if the bytes do not decode
/// to a point on the Edwards curve, or decode to a small-order point. Any
/// Diffie-Hellman output with a small-order point is guessable.
pub fn to_x25519_public(public_key: &PublicKey) -> Result<X25519PublicKey> {
    let verifying_key = VerifyingKey::from_bytes(public_key.as_bytes())
        .map_err(|_| WalletError::ConversionFailure { key: "public key" })?;
    if verifying_key.is_weak() {
        return Err(WalletError::ConversionFailure { key: "public key" });
    }
    Ok(X25519PublicKey::from(verifying_key.to_montgomery().to_bytes()))
}

/// Convert an Ed25519 seed to an X25519 secret.
///
/// The scalar is the clamped lower half of `SHA-512(seed)`, the same scalar
/// Ed25519 itself signs with.
pub fn to_x25519_secret(seed: &[u8; SEED_LEN]) -> StaticSecret {
    let mut hash = [0u8; 64];
    hash.copy_from_slice(&Sha512::digest(seed));

    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&hash[..32]);
    hash.zeroize();

    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;

    let secret = StaticSecret::from(scalar);
    scalar.zeroize();
    secret
}

/// X25519 secret of a signing key pair.
///
/// Transient: built for one operation and dropped with it.
pub(crate) fn dh_secret(keys: &KeyPair) -> StaticSecret {
    to_x25519_secret(&keys.seed())
}

/// Raw X25519 shared secret between `keys` and `peer`.
///
/// Symmetric: `shared_secret(a, b.public) == shared_secret(b, a.public)`.
pub fn shared_secret(keys: &KeyPair, peer: &PublicKey) -> Result<Zeroizing<[u8; 32]>> {
    let peer = to_x25519_public(peer)?;
    let shared = dh_secret(keys).diffie_hellman(&peer);
    if !shared.was_contributory() {
        return Err(WalletError::ConversionFailure { key: "public key" });
    }
    Ok(Zeroizing::new(shared.to_bytes()))
}
