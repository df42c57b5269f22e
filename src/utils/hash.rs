//! Unified hashing utilities using FxHash.
//!
//! Uses `rustc_hash::FxHasher` for fast, deterministic hashing. Adjacency
//! cache keys are derived from here, so the hash must be stable across
//! processes sharing one cache (FxHash has no random seed).
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::compute("some content"); // -> u64
//! let k = hash::of(&(direction, timestamp)); // -> u64
//! ```

use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Compute 64-bit hash of any `Hash` value.
#[inline]
pub fn of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Compute hash and return as 16-char hex fingerprint.
#[inline]
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> String {
    format!("{:016x}", of(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_deterministic() {
        assert_eq!(compute("permalink"), compute("permalink"));
        assert_ne!(compute("permalink"), compute("permalinks"));
    }

    #[test]
    fn test_fingerprint_width() {
        let fp = fingerprint(&(1u8, "next", 20i64));
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_of_distinguishes_field_order() {
        assert_ne!(of(&(1u64, 2u64)), of(&(2u64, 1u64)));
    }
}
