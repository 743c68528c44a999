//! Decides how a candidate payload lands in the record store.

use crate::SizePolicy;
use picsync_core::{ActiveImage, Chunk, Fingerprint, ImageRecord, RecordContent, RecordId};
use picsync_error::{PicsyncResult, StorageError, StorageErrorKind, SyncError, SyncErrorKind};
use picsync_storage::{Committed, RecordStore, WriteBatch, fingerprint, join, split_into_chunks};
use std::sync::Arc;
use tracing::instrument;

/// Which branch a sync took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SyncOutcome {
    /// A new record was written
    #[display("created")]
    Created,
    /// The active record's content was replaced
    #[display("updated")]
    Updated,
    /// A record with the same fingerprint was surfaced to the front
    #[display("touched")]
    Touched,
    /// The active record already holds this payload
    #[display("unchanged")]
    Unchanged,
}

/// Result of one sync.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{} record {} ({} chunks)", outcome, record_id, chunk_count)]
pub struct SyncReport {
    /// Branch taken
    pub outcome: SyncOutcome,
    /// Record now holding the payload
    pub record_id: RecordId,
    /// Fingerprint of the payload
    pub fingerprint: Fingerprint,
    /// Chunk documents backing the record, zero when inline
    pub chunk_count: u32,
}

impl SyncReport {
    /// The record as the new active image.
    pub fn active(&self) -> ActiveImage {
        ActiveImage {
            record_id: self.record_id.clone(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

/// Drives the chunk codec and a record store to sync payloads.
///
/// Every multi-document change (chunks plus their parent record, or stale
/// chunk removal plus the rewrite) goes through a single atomic batch.
///
/// # Examples
///
/// ```
/// use picsync_storage::MemoryRecordStore;
/// use picsync_sync::{SizePolicy, SyncOrchestrator, SyncOutcome};
/// use std::sync::Arc;
///
/// # async fn example() -> picsync_error::PicsyncResult<()> {
/// let store = Arc::new(MemoryRecordStore::default());
/// let orchestrator = SyncOrchestrator::new(store, SizePolicy::default())?;
///
/// let first = orchestrator.sync_payload(None, "data:image/png;base64,AAAA").await?;
/// assert_eq!(first.outcome, SyncOutcome::Created);
///
/// let again = orchestrator.sync_payload(None, "data:image/png;base64,AAAA").await?;
/// assert_eq!(again.outcome, SyncOutcome::Touched);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SyncOrchestrator<S: RecordStore> {
    store: Arc<S>,
    policy: SizePolicy,
}

impl<S: RecordStore> Clone for SyncOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
        }
    }
}

impl<S: RecordStore> SyncOrchestrator<S> {
    /// Create an orchestrator, checking `policy` against the store's limits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` if the policy could produce documents the
    /// store would reject.
    pub fn new(store: Arc<S>, policy: SizePolicy) -> PicsyncResult<Self> {
        policy.validate_for(&store.limits())?;
        Ok(Self { store, policy })
    }

    /// Underlying record store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Size policy in force.
    pub fn policy(&self) -> SizePolicy {
        self.policy
    }

    /// Store `payload`, updating, touching or creating a record.
    ///
    /// `active` is the record the payload was loaded from, if any. The
    /// payload must already be canonical (rotation applied).
    ///
    /// # Errors
    ///
    /// Returns `EmptyPayload` or `PayloadTooLarge` before anything is
    /// written, and store errors if the lookup or the commit fails.
    #[instrument(
        skip(self, payload),
        fields(size = payload.len(), active = active.map(|a| a.record_id.as_str()))
    )]
    pub async fn sync_payload(
        &self,
        active: Option<&ActiveImage>,
        payload: &str,
    ) -> PicsyncResult<SyncReport> {
        if payload.is_empty() {
            return Err(SyncError::new(SyncErrorKind::EmptyPayload).into());
        }
        self.policy.check(payload.len()).inspect_err(|e| {
            tracing::warn!(error = %e, "Payload rejected by size policy");
        })?;

        let fingerprint = fingerprint(payload);
        tracing::debug!(fingerprint = %fingerprint.short(12), "Fingerprinted payload");

        let matches = self.store.find_by_fingerprint(&fingerprint).await?;

        if let Some(active) = active.filter(|a| a.fingerprint != fingerprint) {
            match self.store.get(&active.record_id).await? {
                Some(existing) => {
                    return match matches.iter().find(|r| r.id() != existing.id()) {
                        Some(duplicate) => self.merge_into(&existing, duplicate).await,
                        None => self.update_in_place(&existing, fingerprint, payload).await,
                    };
                }
                None => tracing::warn!(
                    record = %active.record_id,
                    "Active record no longer exists, syncing as new"
                ),
            }
        }

        let already_active = active
            .and_then(|active| matches.iter().find(|r| *r.id() == active.record_id));
        if let Some(record) = already_active {
            tracing::debug!(record = %record.id(), "Active record already holds payload");
            return Ok(report(SyncOutcome::Unchanged, record));
        }
        if let Some(record) = matches.first() {
            return self.touch(record).await;
        }

        self.create(fingerprint, payload).await
    }

    /// Reassemble the payload of `record`.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteData` when fewer chunk documents exist than the
    /// record declares, and `CorruptChunks` when their parts are not
    /// `0..chunk_count`.
    #[instrument(skip(self, record), fields(record = %record.id(), chunked = record.is_chunked()))]
    pub async fn materialize(&self, record: &ImageRecord) -> PicsyncResult<String> {
        match record.content() {
            RecordContent::Inline { payload } => Ok(payload.clone()),
            RecordContent::Chunked { chunk_count } => {
                let chunks = self.store.chunks(record.id()).await?;
                tracing::debug!(found = chunks.len(), expected = chunk_count, "Fetched chunks");
                join(record.id(), chunks, *chunk_count).inspect_err(|e| {
                    tracing::error!(error = %e, "Failed to materialize record");
                })
            }
        }
    }

    /// Delete a record and every chunk document it owns in one batch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    #[instrument(skip(self), fields(record = %id))]
    pub async fn delete(&self, id: &RecordId) -> PicsyncResult<Committed> {
        if self.store.get(id).await?.is_none() {
            return Err(StorageError::new(StorageErrorKind::NotFound(id.to_string())).into());
        }

        let batch = self
            .store
            .chunks(id)
            .await?
            .into_iter()
            .fold(WriteBatch::new(), |batch, chunk| {
                batch.delete_chunk(id.clone(), chunk.part)
            })
            .delete_record(id.clone());

        let removed_chunks = batch.len() - 1;
        let committed = self.store.commit(batch).await?;
        tracing::info!(removed_chunks, "Deleted record");
        Ok(committed)
    }

    async fn update_in_place(
        &self,
        existing: &ImageRecord,
        fingerprint: Fingerprint,
        payload: &str,
    ) -> PicsyncResult<SyncReport> {
        let id = existing.id().clone();
        // Every stored part, not just 0..chunk_count, so earlier orphans go too
        let stale = self.store.chunks(&id).await?;
        let batch = stale
            .iter()
            .fold(WriteBatch::new(), |batch, chunk| batch.delete_chunk(id.clone(), chunk.part));
        let (batch, chunk_count) = self.write_content(batch, id.clone(), fingerprint.clone(), payload)?;

        self.store.commit(batch).await?;
        tracing::info!(
            record = %id,
            stale_chunks = stale.len(),
            chunk_count,
            "Updated record in place"
        );
        Ok(SyncReport {
            outcome: SyncOutcome::Updated,
            record_id: id,
            fingerprint,
            chunk_count,
        })
    }

    /// Fold the edited active record into the record that already holds the
    /// new payload: the duplicate is touched, the active record and its
    /// chunks are removed, all in one batch.
    async fn merge_into(
        &self,
        existing: &ImageRecord,
        duplicate: &ImageRecord,
    ) -> PicsyncResult<SyncReport> {
        let id = existing.id().clone();
        let stale = self.store.chunks(&id).await?;
        let batch = stale
            .iter()
            .fold(WriteBatch::new(), |batch, chunk| batch.delete_chunk(id.clone(), chunk.part))
            .delete_record(id.clone())
            .touch_record(duplicate.id().clone());

        self.store.commit(batch).await?;
        tracing::info!(
            record = %id,
            into = %duplicate.id(),
            stale_chunks = stale.len(),
            "Merged edited record into existing duplicate"
        );
        Ok(report(SyncOutcome::Touched, duplicate))
    }

    async fn touch(&self, record: &ImageRecord) -> PicsyncResult<SyncReport> {
        self.store
            .commit(WriteBatch::new().touch_record(record.id().clone()))
            .await?;
        tracing::info!(record = %record.id(), "Touched existing record");
        Ok(report(SyncOutcome::Touched, record))
    }

    async fn create(&self, fingerprint: Fingerprint, payload: &str) -> PicsyncResult<SyncReport> {
        let id = self.store.new_record_id();
        let (batch, chunk_count) =
            self.write_content(WriteBatch::new(), id.clone(), fingerprint.clone(), payload)?;

        self.store.commit(batch).await?;
        tracing::info!(record = %id, chunk_count, "Created record");
        Ok(SyncReport {
            outcome: SyncOutcome::Created,
            record_id: id,
            fingerprint,
            chunk_count,
        })
    }

    /// Append the chunk and record writes for `payload` to `batch`.
    fn write_content(
        &self,
        batch: WriteBatch,
        id: RecordId,
        fingerprint: Fingerprint,
        payload: &str,
    ) -> PicsyncResult<(WriteBatch, u32)> {
        if !self.policy.should_chunk(payload.len()) {
            let content = RecordContent::Inline {
                payload: payload.to_string(),
            };
            return Ok((batch.put_record(id, fingerprint, content), 0));
        }

        let chunks: Vec<Chunk> = split_into_chunks(payload, self.policy.inline_capacity())?;
        let chunk_count = u32::try_from(chunks.len()).map_err(|_| {
            SyncError::new(SyncErrorKind::PayloadTooLarge {
                size: payload.len(),
                limit: self.policy.inline_capacity().saturating_mul(u32::MAX as usize),
            })
        })?;
        let batch = chunks
            .into_iter()
            .fold(batch, |batch, chunk| batch.put_chunk(id.clone(), chunk));
        let content = RecordContent::Chunked { chunk_count };
        Ok((batch.put_record(id, fingerprint, content), chunk_count))
    }
}

fn report(outcome: SyncOutcome, record: &ImageRecord) -> SyncReport {
    SyncReport {
        outcome,
        record_id: record.id().clone(),
        fingerprint: record.fingerprint().clone(),
        chunk_count: record.chunk_count().unwrap_or(0),
    }
}
