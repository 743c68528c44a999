//! Per-document size limits enforced by record stores.

use crate::{DOCUMENT_CAPACITY_BYTES, METADATA_HEADROOM_BYTES};
use picsync_error::{PicsyncResult, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};

/// Size cap of a single stored document.
///
/// Stores bound the payload-carrying field of each document (an inline
/// payload or a chunk's data) by `document_capacity - metadata_headroom`; the
/// headroom is what the remaining metadata fields may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoreLimits {
    /// Hard cap of one document in bytes
    document_capacity: usize,
    /// Bytes reserved for metadata fields
    metadata_headroom: usize,
}

impl StoreLimits {
    /// Build limits, rejecting headroom that leaves no room for data.
    ///
    /// # Examples
    ///
    /// ```
    /// use picsync_storage::StoreLimits;
    ///
    /// let limits = StoreLimits::new(1_000, 100).unwrap();
    /// assert_eq!(limits.max_field_bytes(), 900);
    /// assert!(StoreLimits::new(100, 100).is_err());
    /// ```
    pub fn new(document_capacity: usize, metadata_headroom: usize) -> PicsyncResult<Self> {
        if metadata_headroom >= document_capacity {
            return Err(StorageError::new(StorageErrorKind::InvalidConfig(format!(
                "metadata headroom {} must be below document capacity {}",
                metadata_headroom, document_capacity
            )))
            .into());
        }
        Ok(Self {
            document_capacity,
            metadata_headroom,
        })
    }

    /// Largest payload slice one document can carry.
    pub fn max_field_bytes(&self) -> usize {
        self.document_capacity - self.metadata_headroom
    }

    /// Reject a payload-carrying field that would overflow its document.
    pub(crate) fn check_field(&self, len: usize) -> PicsyncResult<()> {
        if len > self.max_field_bytes() {
            return Err(StorageError::new(StorageErrorKind::DocumentTooLarge {
                size: len + self.metadata_headroom,
                limit: self.document_capacity,
            })
            .into());
        }
        Ok(())
    }
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            document_capacity: DOCUMENT_CAPACITY_BYTES,
            metadata_headroom: METADATA_HEADROOM_BYTES,
        }
    }
}
