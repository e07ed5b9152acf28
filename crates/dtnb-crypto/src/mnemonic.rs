//! Mnemonic phrases and hierarchical key derivation.
//!
//! The wallet only needs three things from these components: check a
//! phrase, stretch it into a seed, and derive a child key at a path. They
//! sit behind [`MnemonicSource`] and [`PathDeriver`] so other backends can
//! be plugged in. The defaults are BIP-39 (English word list) and SLIP-0010
//! for ed25519.

use bip39::{Language, Mnemonic};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Result, WalletError};

type HmacSha512 = Hmac<Sha512>;

/// Path of the main account key. No other path is used.
pub const DERIVATION_PATH: &str = "m/44'/2002'/0'/0'/0'";

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Validation and seed stretching for mnemonic phrases.
pub trait MnemonicSource {
    fn validate(&self, phrase: &str) -> bool;

    /// 64-byte seed for `phrase` and the optional `password`.
    fn seed_from_phrase(&self, phrase: &str, password: Option<&str>) -> Result<Zeroizing<[u8; 64]>>;
}

/// Derivation of a 32-byte child key from a master seed.
pub trait PathDeriver {
    fn derive_at_path(&self, seed: &[u8], path: &str) -> Result<Zeroizing<[u8; 32]>>;
}

/// Number of words in a generated phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordCount {
    #[default]
    Twelve,
    Fifteen,
    Eighteen,
    TwentyOne,
    TwentyFour,
}

impl WordCount {
    pub const fn words(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::Fifteen => 15,
            WordCount::Eighteen => 18,
            WordCount::TwentyOne => 21,
            WordCount::TwentyFour => 24,
        }
    }

    /// Bytes of entropy behind a phrase of this length.
    pub const fn entropy_bytes(self) -> usize {
        self.words() * 4 / 3
    }
}

impl TryFrom<usize> for WordCount {
    type Error = WalletError;

    fn try_from(words: usize) -> Result<Self> {
        match words {
            12 => Ok(WordCount::Twelve),
            15 => Ok(WordCount::Fifteen),
            18 => Ok(WordCount::Eighteen),
            21 => Ok(WordCount::TwentyOne),
            24 => Ok(WordCount::TwentyFour),
            _ => Err(WalletError::InvalidMnemonic),
        }
    }
}

/// BIP-39 with the English word list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bip39English;

impl MnemonicSource for Bip39English {
    fn validate(&self, phrase: &str) -> bool {
        Mnemonic::parse_in(Language::English, phrase).is_ok()
    }

    fn seed_from_phrase(&self, phrase: &str, password: Option<&str>) -> Result<Zeroizing<[u8; 64]>> {
        let mnemonic = Mnemonic::parse_in(Language::English, phrase)
            .map_err(|_| WalletError::InvalidMnemonic)?;
        Ok(Zeroizing::new(mnemonic.to_seed(password.unwrap_or(""))))
    }
}

/// SLIP-0010 derivation for ed25519. Every path segment must be hardened.
#[derive(Debug, Clone, Copy, Default)]
pub struct Slip10Ed25519;

impl Slip10Ed25519 {
    const MASTER_SECRET: &'static [u8] = b"ed25519 seed";

    fn hmac(key: &[u8], parts: &[&[u8]]) -> Result<([u8; 32], [u8; 32])> {
        let mut mac = HmacSha512::new_from_slice(key)
            .map_err(|e| WalletError::Derivation(format!("HMAC init failed: {e}")))?;
        for part in parts {
            mac.update(part);
        }

        let mut out = [0u8; 64];
        out.copy_from_slice(&mac.finalize().into_bytes());

        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&out[..32]);
        chain_code.copy_from_slice(&out[32..]);
        out.zeroize();

        Ok((key, chain_code))
    }

    /// `"m/44'/2002'/0'"` -> `[44, 2002, 0]`. Accepts `'` or `h` as the
    /// hardened marker.
    fn parse_path(path: &str) -> Result<Vec<u32>> {
        let segments = path
            .trim()
            .strip_prefix("m/")
            .ok_or_else(|| WalletError::Derivation(format!("path must start with 'm/': {path}")))?;

        segments
            .split('/')
            .map(|segment| {
                let index = segment
                    .strip_suffix('\'')
                    .or_else(|| segment.strip_suffix('h'))
                    .ok_or_else(|| {
                        WalletError::Derivation(format!(
                            "ed25519 derivation requires hardened segments, got '{segment}'"
                        ))
                    })?;
                let index: u32 = index
                    .parse()
                    .map_err(|e| WalletError::Derivation(format!("invalid index '{index}': {e}")))?;
                if index >= HARDENED_OFFSET {
                    return Err(WalletError::Derivation(format!("index {index} out of range")));
                }
                Ok(index)
            })
            .collect()
    }
}

impl PathDeriver for Slip10Ed25519 {
    fn derive_at_path(&self, seed: &[u8], path: &str) -> Result<Zeroizing<[u8; 32]>> {
        let indices = Self::parse_path(path)?;

        let (mut key, mut chain_code) = Self::hmac(Self::MASTER_SECRET, &[seed])?;
        for index in indices {
            let hardened = (index | HARDENED_OFFSET).to_be_bytes();
            let (child_key, child_chain) = Self::hmac(&chain_code, &[&[0x00][..], &key[..], &hardened[..]])?;
            key.zeroize();
            chain_code.zeroize();
            key = child_key;
            chain_code = child_chain;
        }
        chain_code.zeroize();

        Ok(Zeroizing::new(key))
    }
}

/// Generate a new English BIP-39 phrase from OS entropy.
pub fn generate_mnemonic(word_count: WordCount) -> Result<String> {
    let mut entropy = Zeroizing::new([0u8; 32]);
    let entropy = &mut entropy[..word_count.entropy_bytes()];
    getrandom::getrandom(entropy).map_err(|_| WalletError::Rng)?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| WalletError::Derivation(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Whether `phrase` is a valid English BIP-39 phrase.
pub fn validate_mnemonic(phrase: &str) -> bool {
    Bip39English.validate(phrase)
}
