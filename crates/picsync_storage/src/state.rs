//! Document state shared by the in-memory and filesystem stores.

use crate::{Committed, StoreLimits, WriteBatch, WriteOp};
use picsync_core::{Chunk, Fingerprint, ImageRecord, RecordContent, RecordId};
use picsync_error::{PicsyncResult, StorageError, StorageErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Records as a subscriber sees them after one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Published {
    pub(crate) version: u64,
    pub(crate) records: Vec<ImageRecord>,
}

/// Every document a store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoreState {
    version: u64,
    clock: u64,
    records: BTreeMap<RecordId, ImageRecord>,
    chunks: BTreeMap<RecordId, BTreeMap<u32, String>>,
}

impl StoreState {
    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn clock(&self) -> u64 {
        self.clock
    }

    pub(crate) fn get(&self, id: &RecordId) -> Option<ImageRecord> {
        self.records.get(id).cloned()
    }

    /// All records, newest order first.
    pub(crate) fn list(&self) -> Vec<ImageRecord> {
        let mut records: Vec<ImageRecord> = self.records.values().cloned().collect();
        sort_newest_first(&mut records);
        records
    }

    pub(crate) fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Vec<ImageRecord> {
        let mut records: Vec<ImageRecord> = self
            .records
            .values()
            .filter(|record| record.fingerprint() == fingerprint)
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        records
    }

    /// Chunks of a record in ascending part order.
    pub(crate) fn chunks(&self, id: &RecordId) -> Vec<Chunk> {
        self.chunks
            .get(id)
            .map(|parts| {
                parts
                    .iter()
                    .map(|(part, data)| Chunk::new(*part, data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn published(&self) -> Arc<Published> {
        Arc::new(Published {
            version: self.version,
            records: self.list(),
        })
    }

    /// Check every operation before anything is mutated.
    ///
    /// Tracks record creation and deletion within the batch so that, for
    /// example, touching a record created earlier in the same batch passes.
    pub(crate) fn validate(&self, batch: &WriteBatch, limits: &StoreLimits) -> PicsyncResult<()> {
        let mut overlay: HashMap<&RecordId, bool> = HashMap::new();
        for op in batch.ops() {
            match op {
                WriteOp::PutRecord { id, content, .. } => {
                    if let RecordContent::Inline { payload } = content {
                        limits.check_field(payload.len())?;
                    }
                    overlay.insert(id, true);
                }
                WriteOp::TouchRecord(id) => {
                    let exists = overlay
                        .get(id)
                        .copied()
                        .unwrap_or_else(|| self.records.contains_key(id));
                    if !exists {
                        return Err(
                            StorageError::new(StorageErrorKind::NotFound(id.to_string())).into(),
                        );
                    }
                }
                WriteOp::PutChunk { chunk, .. } => limits.check_field(chunk.data.len())?,
                WriteOp::DeleteChunk { .. } => {}
                WriteOp::DeleteRecord(id) => {
                    overlay.insert(id, false);
                }
            }
        }
        Ok(())
    }

    /// Apply a batch that already passed `validate`.
    pub(crate) fn apply(&mut self, batch: WriteBatch, now_millis: u64) -> Committed {
        // Monotonic even when the wall clock steps backwards
        let stamp = now_millis.max(self.clock + 1);
        self.clock = stamp;

        for op in batch {
            match op {
                WriteOp::PutRecord {
                    id,
                    fingerprint,
                    content,
                } => {
                    let created_at = self
                        .records
                        .get(&id)
                        .map_or(stamp, |existing| *existing.created_at());
                    let record =
                        ImageRecord::new(id.clone(), fingerprint, stamp, created_at, content);
                    self.records.insert(id, record);
                }
                WriteOp::TouchRecord(id) => {
                    if let Some(record) = self.records.remove(&id) {
                        self.records.insert(id, record.with_order(stamp));
                    }
                }
                WriteOp::PutChunk { record, chunk } => {
                    self.chunks
                        .entry(record)
                        .or_default()
                        .insert(chunk.part, chunk.data);
                }
                WriteOp::DeleteChunk { record, part } => {
                    if let Some(parts) = self.chunks.get_mut(&record) {
                        parts.remove(&part);
                        if parts.is_empty() {
                            self.chunks.remove(&record);
                        }
                    }
                }
                WriteOp::DeleteRecord(id) => {
                    self.records.remove(&id);
                }
            }
        }

        self.version += 1;
        Committed {
            version: self.version,
            stamp,
        }
    }
}

fn sort_newest_first(records: &mut [ImageRecord]) {
    records.sort_by(|a, b| b.order().cmp(a.order()).then_with(|| a.id().cmp(b.id())));
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
