//! Deterministic short code derivation.
//!
//! Codes are a pure function of the submitted URL: the same URL always maps
//! to the same code, in this process and across restarts.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
///
/// Six characters over a hexadecimal alphabet give 16^6 ≈ 16.7M distinct
/// codes. Distinct URLs can collide on a code; the write path overwrites
/// silently, so a collision is an accepted trade-off rather than an error.
pub const CODE_LENGTH: usize = 6;

/// Derives the short code for a URL.
///
/// Hashes the URL's bytes with SHA-256 and keeps the first [`CODE_LENGTH`]
/// characters of the lowercase hex encoding. No I/O, no randomness.
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::generate_code;
///
/// let code = generate_code("https://example.com");
/// assert_eq!(code, generate_code("https://example.com"));
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut code = hex::encode(digest);
    code.truncate(CODE_LENGTH);
    code
}
