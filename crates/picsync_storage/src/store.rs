//! Record store trait definition.

use crate::{Committed, StoreLimits, Subscription, WriteBatch};
use picsync_core::{Chunk, Fingerprint, ImageRecord, RecordContent, RecordId};
use picsync_error::PicsyncResult;

/// Document store holding image records and their chunk documents.
///
/// Implementations provide keyed reads, an exact-match query on the
/// fingerprint, atomic multi-document batches, and change subscriptions.
/// Deleting a record does not cascade to its chunks; callers remove chunk
/// documents explicitly in the same batch.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Allocate a key for a new record.
    fn new_record_id(&self) -> RecordId {
        RecordId::generate()
    }

    /// Per-document size limits this store enforces.
    fn limits(&self) -> StoreLimits;

    /// Fetch one record by key.
    async fn get(&self, id: &RecordId) -> PicsyncResult<Option<ImageRecord>>;

    /// Records whose fingerprint equals `fingerprint`, newest order first.
    async fn find_by_fingerprint(&self, fingerprint: &Fingerprint)
    -> PicsyncResult<Vec<ImageRecord>>;

    /// Every record, newest order first.
    async fn list(&self) -> PicsyncResult<Vec<ImageRecord>>;

    /// Chunk documents of a record in ascending part order.
    async fn chunks(&self, id: &RecordId) -> PicsyncResult<Vec<Chunk>>;

    /// Apply every write in `batch`, or none of them.
    ///
    /// Records written by the batch share one order stamp, taken from the
    /// store's monotonic clock.
    async fn commit(&self, batch: WriteBatch) -> PicsyncResult<Committed>;

    /// Create or replace a single record document.
    async fn upsert(
        &self,
        id: RecordId,
        fingerprint: Fingerprint,
        content: RecordContent,
    ) -> PicsyncResult<Committed> {
        self.commit(WriteBatch::new().put_record(id, fingerprint, content))
            .await
    }

    /// Remove a single record document.
    async fn delete(&self, id: &RecordId) -> PicsyncResult<Committed> {
        self.commit(WriteBatch::new().delete_record(id.clone()))
            .await
    }

    /// Subscribe to the full record list and its changes.
    fn subscribe(&self) -> Subscription;
}
