//! Change notification for record stores.
//!
//! A [`Subscription`] is owned by its consumer: it yields snapshots lazily,
//! can be stopped, and can be restarted from a fresh full snapshot.

use crate::state::Published;
use futures::Stream;
use picsync_core::{ImageRecord, RecordId};
use picsync_error::{PicsyncResult, StorageError, StorageErrorKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

/// How a record changed between two snapshots seen by one subscriber.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, derive_more::Display,
)]
pub enum ChangeKind {
    /// Record appeared
    #[display("added")]
    Added,
    /// Record content or order changed
    #[display("modified")]
    Modified,
    /// Record disappeared
    #[display("removed")]
    Removed,
}

/// Per-record delta carried by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordChange {
    /// What happened
    pub kind: ChangeKind,
    /// Which record
    pub id: RecordId,
}

/// Full current result set plus the deltas since the subscriber's last item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Store version the snapshot reflects
    pub version: u64,
    /// Every record, newest order first
    pub records: Vec<ImageRecord>,
    /// Changes relative to the previous snapshot this subscriber saw
    pub changes: Vec<RecordChange>,
}

/// Consumer-owned sequence of store snapshots.
///
/// The first item after creation or [`restart`](Self::restart) is a full
/// snapshot with every record reported as `Added`. Later items arrive after
/// each commit; commits that land while the consumer is busy are coalesced,
/// but the record list is always the latest.
#[derive(Debug)]
pub struct Subscription {
    source: watch::Receiver<Arc<Published>>,
    seen: BTreeMap<RecordId, ImageRecord>,
    primed: bool,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(source: watch::Receiver<Arc<Published>>) -> Self {
        Self {
            source,
            seen: BTreeMap::new(),
            primed: false,
            active: true,
        }
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the subscription is stopped. If the store goes
    /// away, yields a single `StoreOperationFailed` error and stops.
    pub async fn next(&mut self) -> Option<PicsyncResult<Snapshot>> {
        if !self.active {
            return None;
        }

        if self.primed {
            if self.source.changed().await.is_err() {
                tracing::warn!("Record store closed, ending subscription");
                self.active = false;
                return Some(Err(StorageError::new(StorageErrorKind::StoreOperationFailed(
                    "record store closed".to_string(),
                ))
                .into()));
            }
        } else {
            self.primed = true;
        }

        let published = self.source.borrow_and_update().clone();
        Some(Ok(self.diff(&published)))
    }

    /// Stop yielding snapshots.
    pub fn stop(&mut self) {
        tracing::debug!("Subscription stopped");
        self.active = false;
    }

    /// Resume; the next item is a full snapshot again.
    pub fn restart(&mut self) {
        tracing::debug!("Subscription restarted");
        self.seen.clear();
        self.primed = false;
        self.active = true;
    }

    /// Whether the subscription will yield more items.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Adapt into a stream that ends when the subscription stops.
    pub fn into_stream(mut self) -> impl Stream<Item = PicsyncResult<Snapshot>> + Send {
        async_stream::stream! {
            while let Some(item) = self.next().await {
                yield item;
            }
        }
    }

    fn diff(&mut self, published: &Published) -> Snapshot {
        let mut changes = Vec::new();
        let mut next_seen = BTreeMap::new();

        for record in &published.records {
            match self.seen.remove(record.id()) {
                None => changes.push(RecordChange {
                    kind: ChangeKind::Added,
                    id: record.id().clone(),
                }),
                Some(previous) if previous != *record => changes.push(RecordChange {
                    kind: ChangeKind::Modified,
                    id: record.id().clone(),
                }),
                Some(_) => {}
            }
            next_seen.insert(record.id().clone(), record.clone());
        }
        for id in self.seen.keys() {
            changes.push(RecordChange {
                kind: ChangeKind::Removed,
                id: id.clone(),
            });
        }
        self.seen = next_seen;

        Snapshot {
            version: published.version,
            records: published.records.clone(),
            changes,
        }
    }
}
