//! Cache key derivation.
//!
//! Keys are BLAKE3 digests of the exact input bytes. No case folding or
//! whitespace trimming happens here; callers normalize before hashing if they
//! want two spellings to share an entry.

/// Computes the 32-byte cache key for `text`.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Returns the first 8 bytes of a key as lowercase hex, for log fields.
pub fn short_hex(hash: &[u8; 32]) -> String {
    hash[..8].iter().map(|b| format!("{b:02x}")).collect()
}
