//! Constant-time comparison helpers.

use constant_time_eq::constant_time_eq;

/// Compare two byte slices in constant time.
///
/// Returns `false` for slices of different length.
///
/// ```rust
/// use dtnb_crypto::utils::constant_time_compare;
///
/// assert!(constant_time_compare(b"abc", b"abc"));
/// assert!(!constant_time_compare(b"abc", b"abd"));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    constant_time_eq(a, b)
}
