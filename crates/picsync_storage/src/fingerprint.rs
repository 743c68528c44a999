//! Content addressing for payloads.

use picsync_core::Fingerprint;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 fingerprint of a canonical payload.
///
/// Pure and deterministic: identical payloads always produce the identical
/// 64 character lowercase hex digest.
///
/// # Examples
///
/// ```
/// use picsync_storage::fingerprint;
///
/// let a = fingerprint("data:image/png;base64,AAAA");
/// assert_eq!(a, fingerprint("data:image/png;base64,AAAA"));
/// assert_eq!(a.as_str().len(), 64);
/// ```
pub fn fingerprint(payload: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    Fingerprint::from_digest(hasher.finalize())
}
