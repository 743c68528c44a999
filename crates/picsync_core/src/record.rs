//! Image record and chunk types.

use crate::{Fingerprint, RecordId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Where a record keeps its payload.
///
/// Exactly one layout holds for any stored record, so a record can never be
/// both inline and chunked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum RecordContent {
    /// Payload stored directly in the record document
    Inline {
        /// The full payload
        payload: String,
    },
    /// Payload split across `chunk_count` chunk documents
    Chunked {
        /// Number of chunk documents owned by the record
        chunk_count: u32,
    },
}

impl RecordContent {
    /// Whether the payload lives in chunk documents.
    pub fn is_chunked(&self) -> bool {
        matches!(self, RecordContent::Chunked { .. })
    }

    /// Declared chunk count, present iff chunked.
    pub fn chunk_count(&self) -> Option<u32> {
        match self {
            RecordContent::Chunked { chunk_count } => Some(*chunk_count),
            RecordContent::Inline { .. } => None,
        }
    }

    /// Inline payload, present iff not chunked.
    pub fn inline_payload(&self) -> Option<&str> {
        match self {
            RecordContent::Inline { payload } => Some(payload),
            RecordContent::Chunked { .. } => None,
        }
    }
}

/// One stored image.
///
/// # Examples
///
/// ```
/// use picsync_core::{Fingerprint, ImageRecord, RecordContent, RecordId};
///
/// let record = ImageRecord::new(
///     RecordId::from("r1"),
///     Fingerprint::from_digest([0u8; 32]),
///     10,
///     10,
///     RecordContent::Inline { payload: "data:image/png;base64,AAAA".to_string() },
/// );
/// assert!(!record.is_chunked());
/// assert_eq!(record.inline_payload(), Some("data:image/png;base64,AAAA"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ImageRecord {
    /// Stable key assigned on creation
    id: RecordId,
    /// Content hash of the canonical payload
    fingerprint: Fingerprint,
    /// Display ordering stamp, bumped by every sync that touches the record
    order: u64,
    /// Creation stamp, preserved across updates
    created_at: u64,
    /// Inline payload or chunk metadata
    #[serde(flatten)]
    content: RecordContent,
}

impl ImageRecord {
    /// Assemble a record from its stored fields.
    pub fn new(
        id: RecordId,
        fingerprint: Fingerprint,
        order: u64,
        created_at: u64,
        content: RecordContent,
    ) -> Self {
        Self {
            id,
            fingerprint,
            order,
            created_at,
            content,
        }
    }

    /// Whether the payload lives in chunk documents.
    pub fn is_chunked(&self) -> bool {
        self.content.is_chunked()
    }

    /// Declared chunk count, present iff chunked.
    pub fn chunk_count(&self) -> Option<u32> {
        self.content.chunk_count()
    }

    /// Inline payload, present iff not chunked.
    pub fn inline_payload(&self) -> Option<&str> {
        self.content.inline_payload()
    }

    /// Same record with a new ordering stamp.
    pub fn with_order(self, order: u64) -> Self {
        Self { order, ..self }
    }
}

/// One bounded slice of an oversized payload.
///
/// Chunks belong to exactly one record and are reassembled in ascending
/// `part` order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chunk {
    /// Zero-based position within the parent record
    pub part: u32,
    /// Substring of the original payload
    pub data: String,
}

impl Chunk {
    /// Create a chunk.
    pub fn new(part: u32, data: impl Into<String>) -> Self {
        Self {
            part,
            data: data.into(),
        }
    }
}
