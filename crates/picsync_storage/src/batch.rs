//! Atomic multi-document write batches.

use picsync_core::{Chunk, Fingerprint, RecordContent, RecordId};

/// One document mutation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Create or replace a record; the store stamps `order`
    PutRecord {
        /// Record key
        id: RecordId,
        /// Fingerprint of the payload
        fingerprint: Fingerprint,
        /// Inline payload or chunk metadata
        content: RecordContent,
    },
    /// Bump a record's `order` without touching its content
    TouchRecord(RecordId),
    /// Create or replace one chunk document
    PutChunk {
        /// Owning record
        record: RecordId,
        /// Chunk to write
        chunk: Chunk,
    },
    /// Remove one chunk document
    DeleteChunk {
        /// Owning record
        record: RecordId,
        /// Part index to remove
        part: u32,
    },
    /// Remove a record document; its chunks are separate documents
    DeleteRecord(RecordId),
}

/// Ordered set of writes that a store applies all together or not at all.
///
/// # Examples
///
/// ```
/// use picsync_core::{Chunk, Fingerprint, RecordContent, RecordId};
/// use picsync_storage::WriteBatch;
///
/// let id = RecordId::from("r1");
/// let batch = WriteBatch::new()
///     .put_chunk(id.clone(), Chunk::new(0, "ab"))
///     .put_chunk(id.clone(), Chunk::new(1, "c"))
///     .put_record(
///         id,
///         Fingerprint::from_digest([0u8; 32]),
///         RecordContent::Chunked { chunk_count: 2 },
///     );
/// assert_eq!(batch.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record write.
    pub fn put_record(
        mut self,
        id: RecordId,
        fingerprint: Fingerprint,
        content: RecordContent,
    ) -> Self {
        self.ops.push(WriteOp::PutRecord {
            id,
            fingerprint,
            content,
        });
        self
    }

    /// Append an order bump.
    pub fn touch_record(mut self, id: RecordId) -> Self {
        self.ops.push(WriteOp::TouchRecord(id));
        self
    }

    /// Append a chunk write.
    pub fn put_chunk(mut self, record: RecordId, chunk: Chunk) -> Self {
        self.ops.push(WriteOp::PutChunk { record, chunk });
        self
    }

    /// Append a chunk delete.
    pub fn delete_chunk(mut self, record: RecordId, part: u32) -> Self {
        self.ops.push(WriteOp::DeleteChunk { record, part });
        self
    }

    /// Append a record delete.
    pub fn delete_record(mut self, id: RecordId) -> Self {
        self.ops.push(WriteOp::DeleteRecord(id));
        self
    }

    /// Operations in application order.
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch holds no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Committed {
    /// Store version after the commit
    pub version: u64,
    /// Order stamp applied to every record written by the batch
    pub stamp: u64,
}
