//! Record key type.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable key of an image record.
///
/// Assigned once when the record is created and never changed.
///
/// # Examples
///
/// ```
/// use picsync_core::RecordId;
///
/// let id = RecordId::generate();
/// assert_eq!(id.as_str().len(), 32);
/// assert_ne!(id, RecordId::generate());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Allocate a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
