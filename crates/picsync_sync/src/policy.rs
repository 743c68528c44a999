//! Size policy applied to candidate payloads before any write.

use picsync_error::{PicsyncResult, SyncError, SyncErrorKind};
use picsync_storage::{DEFAULT_CHUNK_CAPACITY_BYTES, StoreLimits};
use serde::{Deserialize, Serialize};

/// How the orchestrator stores payloads of a given size.
///
/// # Examples
///
/// ```
/// use picsync_sync::SizePolicy;
///
/// let policy = SizePolicy::Chunked { chunk_capacity: 10, max_payload_bytes: None };
/// assert!(!policy.should_chunk(10));
/// assert!(policy.should_chunk(11));
///
/// let strict = SizePolicy::InlineOnly { max_inline_bytes: 10 };
/// assert!(strict.check(11).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SizePolicy {
    /// Store inline up to `chunk_capacity`, chunk anything larger.
    Chunked {
        /// Largest payload stored inline, and the size of each chunk
        chunk_capacity: usize,
        /// Optional absolute limit on the payload size
        max_payload_bytes: Option<usize>,
    },
    /// Never chunk; anything over the inline cap is rejected.
    InlineOnly {
        /// Largest payload accepted
        max_inline_bytes: usize,
    },
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self::Chunked {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY_BYTES,
            max_payload_bytes: None,
        }
    }
}

impl SizePolicy {
    /// Largest payload kept inline in its record.
    pub fn inline_capacity(&self) -> usize {
        match self {
            Self::Chunked { chunk_capacity, .. } => *chunk_capacity,
            Self::InlineOnly { max_inline_bytes } => *max_inline_bytes,
        }
    }

    /// Whether a payload of `len` bytes goes to chunk documents.
    pub fn should_chunk(&self, len: usize) -> bool {
        matches!(self, Self::Chunked { chunk_capacity, .. } if len > *chunk_capacity)
    }

    /// Reject a payload of `len` bytes the policy cannot store.
    pub fn check(&self, len: usize) -> PicsyncResult<()> {
        let limit = match self {
            Self::Chunked {
                max_payload_bytes: Some(max),
                ..
            } => *max,
            Self::Chunked {
                max_payload_bytes: None,
                ..
            } => return Ok(()),
            Self::InlineOnly { max_inline_bytes } => *max_inline_bytes,
        };
        if len > limit {
            return Err(SyncError::new(SyncErrorKind::PayloadTooLarge { size: len, limit }).into());
        }
        Ok(())
    }

    /// Ensure every document the policy produces stays under the store's cap.
    pub fn validate_against(&self, document_capacity: usize) -> PicsyncResult<()> {
        let capacity = self.inline_capacity();
        if capacity == 0 {
            return Err(SyncError::new(SyncErrorKind::InvalidPolicy(
                "inline capacity must be positive".to_string(),
            ))
            .into());
        }
        if capacity >= document_capacity {
            return Err(SyncError::new(SyncErrorKind::InvalidPolicy(format!(
                "capacity {} must be below the {} byte document cap",
                capacity, document_capacity
            )))
            .into());
        }
        Ok(())
    }

    /// Check the policy against a store's limits, headroom included.
    pub fn validate_for(&self, limits: &StoreLimits) -> PicsyncResult<()> {
        self.validate_against(*limits.document_capacity())?;
        if self.inline_capacity() > limits.max_field_bytes() {
            return Err(SyncError::new(SyncErrorKind::InvalidPolicy(format!(
                "capacity {} leaves less than {} bytes of metadata headroom",
                self.inline_capacity(),
                limits.metadata_headroom()
            )))
            .into());
        }
        Ok(())
    }
}
