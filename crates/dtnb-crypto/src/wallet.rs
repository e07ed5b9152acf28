//! Key pair construction and the [`Wallet`] facade.
//!
//! A key pair is built from a 32-byte Ed25519 seed: given as hex, drawn from
//! the OS random source, or derived from a BIP-39 mnemonic along
//! [`DERIVATION_PATH`](crate::mnemonic::DERIVATION_PATH). The same seed
//! always yields the same key pair.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use tracing::debug;
use zeroize::Zeroizing;

use crate::codec;
use crate::encrypt::{self, EncryptedMessage, Nonce};
use crate::error::{Result, WalletError};
use crate::mnemonic::{Bip39English, MnemonicSource, PathDeriver, Slip10Ed25519, DERIVATION_PATH};
use crate::sign::{self, Signature};
use crate::utils::constant_time_compare;

/// Length of an Ed25519 seed.
pub const SEED_LEN: usize = 32;
/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of the internal signing secret (seed followed by public key).
pub const SECRET_KEY_LEN: usize = 64;

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Fails with [`WalletError::InvalidInputLength`] unless `bytes` is 32 long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        codec::to_array(bytes, "public key").map(Self)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        codec::from_hex_array(hex, "public key").map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        codec::to_hex(self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl std::str::FromStr for PublicKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// An Ed25519 signing key pair.
///
/// The secret is the 64-byte form the signing scheme works with: the seed
/// followed by the derived public key, so `secret_key[32..] == public_key`
/// always holds. Only the seed half carries entropy and only the seed half
/// is ever handed out. The signing key zeroizes its secret on drop.
#[derive(Clone)]
pub struct KeyPair {
    public_key: PublicKey,
    signing_key: SigningKey,
}

impl KeyPair {
    /// Deterministically build the key pair for `seed`.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Build the key pair for a hex-encoded 32-byte seed.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self> {
        let bytes = Zeroizing::new(codec::from_hex(seed_hex)?);
        let seed = Zeroizing::new(codec::to_array::<SEED_LEN>(&bytes, "seed")?);
        Ok(Self::from_seed(&seed))
    }

    /// Build the key pair for the 64-byte `seed || public_key` form.
    ///
    /// Fails with [`WalletError::InvalidKeyPair`] if the public half is not
    /// the public key of the seed half.
    pub fn from_secret_key(secret_key: &[u8; SECRET_KEY_LEN]) -> Result<Self> {
        SigningKey::from_keypair_bytes(secret_key)
            .map(Self::from_signing_key)
            .map_err(|_| WalletError::InvalidKeyPair)
    }

    /// Build a key pair from a fresh seed drawn from the OS random source.
    pub fn generate() -> Result<Self> {
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        getrandom::getrandom(&mut seed[..]).map_err(|_| WalletError::Rng)?;
        Ok(Self::from_seed(&seed))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        Self {
            public_key: PublicKey(signing_key.verifying_key().to_bytes()),
            signing_key,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Copy of the seed half of the secret key.
    pub fn seed(&self) -> Zeroizing<[u8; SEED_LEN]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Copy of the full 64-byte secret key.
    pub fn secret_key(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    /// The 32-byte seed as hex. The 64-byte internal form is never exposed.
    pub fn secret_key_hex(&self) -> String {
        codec::to_hex(&self.seed()[..])
    }

    pub fn public_key_hex(&self) -> String {
        self.public_key.to_hex()
    }

    /// Sign raw bytes, returning the detached signature.
    pub fn sign_bytes(&self, message: &[u8]) -> Signature {
        Signature::from_array(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Account wallet: owns one [`KeyPair`] and signs and encrypts with it.
#[derive(Clone, Debug)]
pub struct Wallet {
    keys: KeyPair,
}

impl Wallet {
    /// Build a wallet from a hex seed, or from a random seed when `None`.
    ///
    /// Fails with [`WalletError::InvalidInputLength`] if the seed does not
    /// decode to exactly 32 bytes.
    pub fn new(seed_hex: Option<&str>) -> Result<Self> {
        match seed_hex {
            Some(hex) => Self::from_secret_hex(hex),
            None => Self::generate(),
        }
    }

    pub fn generate() -> Result<Self> {
        let keys = KeyPair::generate()?;
        debug!(public_key = %keys.public_key(), "generated random key pair");
        Ok(Self { keys })
    }

    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self {
            keys: KeyPair::from_seed(seed),
        }
    }

    pub fn from_secret_hex(secret_hex: &str) -> Result<Self> {
        let keys = KeyPair::from_seed_hex(secret_hex)?;
        debug!(public_key = %keys.public_key(), "constructed key pair from seed");
        Ok(Self { keys })
    }

    /// Build a wallet from a secret/public pair, rejecting mismatched keys.
    pub fn from_hex_keys(secret_hex: &str, public_hex: &str) -> Result<Self> {
        let wallet = Self::from_secret_hex(secret_hex)?;
        let public = PublicKey::from_hex(public_hex)?;
        if !constant_time_compare(wallet.public_key().as_bytes(), public.as_bytes()) {
            return Err(WalletError::InvalidKeyPair);
        }
        Ok(wallet)
    }

    /// Recover the main wallet of a BIP-39 mnemonic phrase.
    ///
    /// The phrase is checked against the English word list, stretched into a
    /// 64-byte seed with the optional `password`, and the key at
    /// [`DERIVATION_PATH`] becomes the wallet seed.
    pub fn from_mnemonic(phrase: &str, password: Option<&str>) -> Result<Self> {
        Self::from_mnemonic_with(&Bip39English, &Slip10Ed25519, phrase, password)
    }

    /// [`Wallet::from_mnemonic`] with explicit mnemonic and derivation backends.
    pub fn from_mnemonic_with<M, D>(
        mnemonic: &M,
        deriver: &D,
        phrase: &str,
        password: Option<&str>,
    ) -> Result<Self>
    where
        M: MnemonicSource + ?Sized,
        D: PathDeriver + ?Sized,
    {
        if !mnemonic.validate(phrase) {
            return Err(WalletError::InvalidMnemonic);
        }
        let seed = mnemonic.seed_from_phrase(phrase, password)?;
        let key = deriver.derive_at_path(&seed[..], DERIVATION_PATH)?;
        let wallet = Self::from_seed(&key);
        debug!(
            public_key = %wallet.public_key(),
            path = DERIVATION_PATH,
            "recovered wallet from mnemonic"
        );
        Ok(wallet)
    }

    /// Whether `public_hex` is the public key of the seed `secret_hex`.
    ///
    /// Never fails: malformed input simply answers `false`.
    pub fn is_valid_pair(secret_hex: &str, public_hex: &str) -> bool {
        match KeyPair::from_seed_hex(secret_hex) {
            Ok(keys) => constant_time_compare(keys.public_key_hex().as_bytes(), public_hex.as_bytes()),
            Err(_) => false,
        }
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.keys
    }

    pub fn public_key(&self) -> &PublicKey {
        self.keys.public_key()
    }

    /// The 32-byte public key as 64 hex characters.
    pub fn public_key_hex(&self) -> String {
        self.keys.public_key_hex()
    }

    /// The 32-byte seed as 64 hex characters.
    pub fn secret_key_hex(&self) -> String {
        self.keys.secret_key_hex()
    }

    /// Detached signature of `message`, as 128 hex characters.
    pub fn sign(&self, message: &str) -> String {
        sign::create_signature(message, &self.keys)
    }

    /// Signature followed by `message`, hex-encoded.
    pub fn sign_message(&self, message: &str) -> String {
        sign::sign_message(message, &self.keys)
    }

    /// Encrypt `message` for `peer`. A random nonce is drawn when `nonce` is `None`.
    pub fn encrypt(
        &self,
        peer: &PublicKey,
        message: &str,
        nonce: Option<Nonce>,
    ) -> Result<EncryptedMessage> {
        encrypt::encrypt_message(&self.keys, peer, message, nonce)
    }

    /// Decrypt a payload exchanged with `peer`.
    ///
    /// Works for either role: the sender decrypting with the receiver's
    /// public key, or the receiver decrypting with the sender's.
    pub fn decrypt(&self, peer: &PublicKey, encrypted_message: &str, nonce: &Nonce) -> Result<String> {
        encrypt::decrypt_message(&self.keys, peer, encrypted_message, nonce)
    }

    /// [`Wallet::decrypt`] for a whole [`EncryptedMessage`].
    pub fn decrypt_envelope(&self, peer: &PublicKey, envelope: &EncryptedMessage) -> Result<String> {
        let nonce = envelope.parse_nonce()?;
        self.decrypt(peer, &envelope.encrypted_message, &nonce)
    }
}
