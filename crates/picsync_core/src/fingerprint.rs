//! Content fingerprint type.

use picsync_error::{PicsyncResult, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};

/// Length of a rendered SHA-256 digest in hex characters.
const DIGEST_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of a canonical payload.
///
/// Identical payloads always share a fingerprint, which is what lets the
/// orchestrator deduplicate records.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Render raw digest bytes as a fingerprint.
    pub fn from_digest(digest: impl AsRef<[u8]>) -> Self {
        Self(
            digest
                .as_ref()
                .iter()
                .map(|byte| format!("{:02x}", byte))
                .collect(),
        )
    }

    /// Validate an externally supplied digest.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFingerprint` unless the value is exactly 64 lowercase
    /// hex characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use picsync_core::Fingerprint;
    ///
    /// let hex = "a".repeat(64);
    /// assert!(Fingerprint::parse(&hex).is_ok());
    /// assert!(Fingerprint::parse("ABC").is_err());
    /// ```
    pub fn parse(value: impl Into<String>) -> PicsyncResult<Self> {
        let value = value.into();
        let well_formed = value.len() == DIGEST_HEX_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !well_formed {
            return Err(StorageError::new(StorageErrorKind::InvalidFingerprint(value)).into());
        }
        Ok(Self(value))
    }

    /// Borrow the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters, for log lines and listings.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = picsync_error::PicsyncError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}
