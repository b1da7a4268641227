//! Content digests used for record identity and association dedup.
//!
//! - algorithm: SHA-256
//! - input: the UTF-8 bytes of the canonical content string
//! - output: 64 lowercase hex digits, no prefix
//!
//! The digest is a pure function of its input, so hashes stay stable across
//! process restarts and can be compared with values cached by other runs.

use sha2::{Digest as _, Sha256};
use std::fmt::Write as _;

/// Width of [`digest_hex`] output in characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hex-encoded SHA-256 of `text`.
pub fn digest_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(DIGEST_HEX_LEN);
    for b in digest.iter() {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_has_expected_width_and_alphabet() {
        let d = digest_hex("prefix:1-biolink:somePredicate-prefix:2");
        assert_eq!(d.len(), DIGEST_HEX_LEN);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_matches_known_sha256() {
        assert_eq!(
            digest_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_changes_with_input() {
        assert_ne!(digest_hex("a-b"), digest_hex("a-c"));
        assert_eq!(digest_hex("a-b"), digest_hex("a-b"));
    }
}
