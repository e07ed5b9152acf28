//! Byte, hex and text conversions.
//!
//! Hex output is always lower-case without a `0x` prefix. Decoding accepts
//! either case but requires an even number of digits.

use crate::error::{Result, WalletError};

/// Encode bytes as lower-case hex.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode a hex string of any even length.
pub fn from_hex(hex: &str) -> Result<Vec<u8>> {
    hex::decode(hex).map_err(|_| WalletError::InvalidHex)
}

/// Decode a hex string that must hold exactly `N` bytes.
///
/// `what` names the value in the resulting error, e.g. `"seed"`.
pub fn from_hex_array<const N: usize>(hex: &str, what: &'static str) -> Result<[u8; N]> {
    let bytes = from_hex(hex)?;
    to_array(&bytes, what)
}

/// Copy a slice into a fixed-size array, failing on any other length.
pub fn to_array<const N: usize>(bytes: &[u8], what: &'static str) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| WalletError::InvalidInputLength {
            what,
            expected: N,
            got: bytes.len(),
        })
}

/// UTF-8 bytes of a text message. No normalization is applied.
pub fn text_to_bytes(text: &str) -> &[u8] {
    text.as_bytes()
}

/// Decode UTF-8 bytes into text, replacing invalid sequences with U+FFFD.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
