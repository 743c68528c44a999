//! In-process record store.

use crate::state::{Published, StoreState, now_millis};
use crate::{Committed, RecordStore, StoreLimits, Subscription, WriteBatch};
use picsync_core::{Chunk, Fingerprint, ImageRecord, RecordId};
use picsync_error::PicsyncResult;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

/// Record store that keeps every document in memory.
///
/// Commits take a write lock, validate the whole batch, then apply it, so
/// readers never observe half of a batch. Each commit publishes the new
/// record list to subscribers.
///
/// # Example
///
/// ```
/// use picsync_core::{RecordContent, RecordId};
/// use picsync_storage::{MemoryRecordStore, RecordStore, fingerprint};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryRecordStore::default();
/// let payload = "data:image/png;base64,AAAA";
/// let id = store.new_record_id();
/// store
///     .upsert(id.clone(), fingerprint(payload), RecordContent::Inline { payload: payload.to_string() })
///     .await?;
/// assert!(store.get(&id).await?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryRecordStore {
    state: RwLock<StoreState>,
    publisher: watch::Sender<Arc<Published>>,
    limits: StoreLimits,
}

impl MemoryRecordStore {
    /// Create an empty store enforcing `limits`.
    #[tracing::instrument]
    pub fn new(limits: StoreLimits) -> Self {
        let state = StoreState::default();
        let (publisher, _) = watch::channel(state.published());
        tracing::debug!(
            document_capacity = limits.document_capacity(),
            "Created in-memory record store"
        );
        Self {
            state: RwLock::new(state),
            publisher,
            limits,
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new(StoreLimits::default())
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    fn limits(&self) -> StoreLimits {
        self.limits
    }

    async fn get(&self, id: &RecordId) -> PicsyncResult<Option<ImageRecord>> {
        Ok(self.state.read().await.get(id))
    }

    async fn find_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> PicsyncResult<Vec<ImageRecord>> {
        let records = self.state.read().await.find_by_fingerprint(fingerprint);
        tracing::debug!(
            fingerprint = fingerprint.short(12),
            matches = records.len(),
            "Queried records by fingerprint"
        );
        Ok(records)
    }

    async fn list(&self) -> PicsyncResult<Vec<ImageRecord>> {
        Ok(self.state.read().await.list())
    }

    async fn chunks(&self, id: &RecordId) -> PicsyncResult<Vec<Chunk>> {
        Ok(self.state.read().await.chunks(id))
    }

    #[tracing::instrument(skip(self, batch), fields(ops = batch.len()))]
    async fn commit(&self, batch: WriteBatch) -> PicsyncResult<Committed> {
        let mut state = self.state.write().await;
        if batch.is_empty() {
            return Ok(Committed {
                version: state.version(),
                stamp: state.clock(),
            });
        }

        if let Err(e) = state.validate(&batch, &self.limits) {
            tracing::warn!(error = %e, "Rejected write batch");
            return Err(e);
        }
        let committed = state.apply(batch, now_millis());
        self.publisher.send_replace(state.published());

        tracing::debug!(
            version = committed.version,
            stamp = committed.stamp,
            "Committed write batch"
        );
        Ok(committed)
    }

    fn subscribe(&self) -> Subscription {
        Subscription::new(self.publisher.subscribe())
    }
}
