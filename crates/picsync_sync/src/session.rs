//! View-state session driving the orchestrator on behalf of a renderer.
//!
//! A [`Session`] owns the current [`ViewState`] and publishes every
//! transition on a `watch` channel. Operations never return errors: failures
//! are logged and surfaced as a [`Notice`] on the next state.

use crate::{SyncOrchestrator, SyncReport};
use picsync_core::{
    ActiveImage, DisplayedImage, ImageRecord, Notice, RecordId, Rotation, ViewState,
};
use picsync_error::{
    PicsyncError, PicsyncResult, StorageError, StorageErrorKind, SyncError, SyncErrorKind,
};
use picsync_hosting::ImageHost;
use picsync_image::rotate_payload;
use picsync_storage::{RecordStore, Snapshot, Subscription};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::instrument;

/// Single logical flow of user operations against one store.
///
/// # Examples
///
/// ```
/// use picsync_storage::MemoryRecordStore;
/// use picsync_sync::{Session, SizePolicy, SyncOrchestrator};
/// use std::sync::Arc;
///
/// # async fn example() -> picsync_error::PicsyncResult<()> {
/// let store = Arc::new(MemoryRecordStore::default());
/// let session = Session::new(SyncOrchestrator::new(store, SizePolicy::default())?);
/// let view = session.watch();
///
/// session.load_local("https://i.imgur.com/abc.png");
/// session.sync().await;
/// assert_eq!(view.borrow().records().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<S: RecordStore> {
    orchestrator: SyncOrchestrator<S>,
    state: watch::Sender<ViewState>,
}

impl<S: RecordStore> Session<S> {
    /// Start a session with an empty view.
    pub fn new(orchestrator: SyncOrchestrator<S>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            orchestrator,
            state,
        }
    }

    /// Receive every view-state transition.
    pub fn watch(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Current view state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Orchestrator the session drives.
    pub fn orchestrator(&self) -> &SyncOrchestrator<S> {
        &self.orchestrator
    }

    /// Subscribe to the underlying store.
    pub fn subscribe(&self) -> Subscription {
        self.orchestrator.store().subscribe()
    }

    /// Show a freshly picked image that no record backs yet.
    pub fn load_local(&self, payload: impl Into<Arc<str>>) {
        let payload = payload.into();
        self.update(|state| state.with_local_image(payload).without_notice());
    }

    /// Swap the on-screen payload, keeping the record it was loaded from.
    ///
    /// The next [`sync`](Self::sync) then updates that record in place.
    pub fn replace_displayed(&self, payload: impl Into<Arc<str>>) {
        let payload = payload.into();
        self.update(|state| {
            let origin = state.displayed().as_ref().and_then(|d| d.origin.clone());
            state.with_displayed(DisplayedImage { origin, payload })
        });
    }

    /// Set the pending rotation applied at the next sync.
    pub fn rotate(&self, rotation: Rotation) {
        self.update(|state| state.with_rotation(rotation));
    }

    /// Add a quarter turn clockwise.
    pub fn rotate_clockwise(&self) {
        self.update(ViewState::rotated_clockwise);
    }

    /// Add a quarter turn counter-clockwise.
    pub fn rotate_counter_clockwise(&self) {
        self.update(ViewState::rotated_counter_clockwise);
    }

    /// Canonicalize the displayed image and sync it.
    ///
    /// Returns the report on success; on failure the state carries an error
    /// notice and `None` is returned.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Option<SyncReport> {
        let state = self.state();
        let Some(displayed) = state.displayed().clone() else {
            self.fail("Sync failed", SyncError::new(SyncErrorKind::NothingSelected).into());
            return None;
        };

        self.update(|state| state.with_busy(true));
        match self.sync_displayed(&displayed, *state.rotation()).await {
            Ok((report, canonical)) => {
                tracing::info!(%report, "Synced image");
                let notice = Notice::info(format!("Synced: {}", report));
                self.update(|state| {
                    state
                        .after_sync(report.active(), canonical)
                        .with_notice(notice)
                });
                self.refresh().await;
                Some(report)
            }
            Err(e) => {
                self.fail("Sync failed", e);
                None
            }
        }
    }

    /// Upload `bytes` to an image host, then sync the hosted link.
    ///
    /// Nothing is written to the store if the upload fails.
    #[instrument(skip(self, host, bytes), fields(size = bytes.len(), provider = %host.provider()))]
    pub async fn sync_hosted(
        &self,
        host: &dyn ImageHost,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Option<SyncReport> {
        self.update(|state| state.with_busy(true));

        let hosted = match host.upload(bytes, filename).await {
            Ok(hosted) => hosted,
            Err(e) => {
                self.fail("Upload failed", e);
                return None;
            }
        };

        match self.orchestrator.sync_payload(None, &hosted.url).await {
            Ok(report) => {
                let notice = Notice::info(format!("Uploaded and synced: {}", report));
                self.update(|state| {
                    state
                        .after_sync(report.active(), hosted.url.as_str())
                        .with_notice(notice)
                });
                self.refresh().await;
                Some(report)
            }
            Err(e) => {
                self.fail("Sync failed", e);
                None
            }
        }
    }

    /// Load the record at `index` and put it on screen.
    ///
    /// Returns whether the displayed image changed. On failure the previous
    /// display is left untouched.
    #[instrument(skip(self))]
    pub async fn open(&self, index: usize) -> bool {
        let Some(record) = self.state().records().get(index).cloned() else {
            self.fail("Open failed", SyncError::new(SyncErrorKind::NothingSelected).into());
            return false;
        };
        self.load(record).await
    }

    /// Load the record with key `id` and put it on screen.
    #[instrument(skip(self), fields(record = %id))]
    pub async fn open_record(&self, id: &RecordId) -> bool {
        let record = self
            .state()
            .records()
            .iter()
            .find(|record| record.id() == id)
            .cloned();
        match record {
            Some(record) => self.load(record).await,
            None => match self.orchestrator.store().get(id).await {
                Ok(Some(record)) => self.load(record).await,
                Ok(None) => {
                    self.fail(
                        "Open failed",
                        StorageError::new(StorageErrorKind::NotFound(id.to_string())).into(),
                    );
                    false
                }
                Err(e) => {
                    self.fail("Open failed", e);
                    false
                }
            },
        }
    }

    /// Step to the next record, wrapping around.
    ///
    /// The selection only moves once the record has been loaded.
    pub async fn next(&self) -> bool {
        let state = self.state();
        self.step_to(state.next_index().and_then(|i| state.records().get(i).cloned()))
            .await
    }

    /// Step to the previous record, wrapping around.
    pub async fn previous(&self) -> bool {
        let state = self.state();
        self.step_to(state.previous_index().and_then(|i| state.records().get(i).cloned()))
            .await
    }

    /// Delete the selected record and its chunks.
    #[instrument(skip(self))]
    pub async fn delete_current(&self) -> bool {
        let Some(record) = self.state().current_record().cloned() else {
            self.fail("Delete failed", SyncError::new(SyncErrorKind::NothingSelected).into());
            return false;
        };

        self.update(|state| state.with_busy(true));
        match self.orchestrator.delete(record.id()).await {
            Ok(_) => {
                let notice = Notice::info(format!("Deleted record {}", record.id()));
                self.update(|state| state.with_notice(notice));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail("Delete failed", e);
                false
            }
        }
    }

    /// Reconcile with a store snapshot, reloading the display if the
    /// selected record changed underneath it.
    #[instrument(skip(self, snapshot), fields(version = snapshot.version, records = snapshot.records.len()))]
    pub async fn apply_snapshot(&self, snapshot: Snapshot) {
        self.reconcile(snapshot.records).await;
    }

    /// Re-read the full record list from the store.
    pub async fn refresh(&self) {
        match self.orchestrator.store().list().await {
            Ok(records) => self.reconcile(records).await,
            Err(e) => self.fail("Refresh failed", e),
        }
    }

    /// Apply snapshots from `subscription` until it ends.
    ///
    /// Subscription errors re-show the busy indicator; the subscription
    /// decides whether more items follow.
    #[instrument(skip(self, subscription))]
    pub async fn follow(&self, mut subscription: Subscription) {
        self.update(|state| state.with_busy(true));
        while let Some(item) = subscription.next().await {
            match item {
                Ok(snapshot) => self.apply_snapshot(snapshot).await,
                Err(e) => {
                    tracing::error!(error = %e, "Record store subscription failed");
                    let notice = Notice::error(format!("Live updates failed: {}", e));
                    self.update(|state| state.with_busy(true).with_notice(notice));
                }
            }
        }
        tracing::debug!("Subscription ended");
    }

    async fn sync_displayed(
        &self,
        displayed: &DisplayedImage,
        rotation: Rotation,
    ) -> PicsyncResult<(SyncReport, String)> {
        let canonical = rotate_payload(&displayed.payload, rotation)?;
        let report = self
            .orchestrator
            .sync_payload(displayed.origin.as_ref(), &canonical)
            .await?;
        Ok((report, canonical))
    }

    async fn reconcile(&self, records: Vec<ImageRecord>) {
        self.update(|state| state.with_snapshot(records));
        let state = self.state();

        let shows_record = state
            .displayed()
            .as_ref()
            .is_some_and(|displayed| displayed.origin.is_some());
        if state.records().is_empty() && shows_record {
            self.update(|state| {
                state
                    .without_displayed()
                    .with_busy(false)
                    .with_notice(Notice::info("No images stored"))
            });
            return;
        }

        if !self.reload_if_stale().await {
            self.update(|state| state.with_busy(false));
        }
    }

    async fn step_to(&self, record: Option<ImageRecord>) -> bool {
        match record {
            Some(record) => self.load(record).await,
            None => false,
        }
    }

    async fn reload_if_stale(&self) -> bool {
        let state = self.state();
        if !state.needs_reload() {
            return false;
        }
        match state.current_record().cloned() {
            Some(record) => self.load(record).await,
            None => false,
        }
    }

    async fn load(&self, record: ImageRecord) -> bool {
        self.update(|state| state.with_busy(true));
        match self.orchestrator.materialize(&record).await {
            Ok(payload) => {
                let origin = ActiveImage::from(&record);
                self.update(|state| {
                    let state = match state.records().iter().position(|r| r.id() == record.id()) {
                        Some(index) => state.select(index),
                        None => state,
                    };
                    state
                        .with_displayed(DisplayedImage::from_record(origin, payload))
                        .with_busy(false)
                });
                tracing::debug!(record = %record.id(), "Displayed record");
                true
            }
            Err(e) => {
                self.fail("Failed to load image", e);
                false
            }
        }
    }

    fn fail(&self, context: &str, error: PicsyncError) {
        tracing::error!(error = %error, "{}", context);
        let notice = Notice::error(format!("{}: {}", context, error));
        self.update(|state| state.with_busy(false).with_notice(notice));
    }

    fn update(&self, transition: impl FnOnce(ViewState) -> ViewState) {
        self.state
            .send_modify(|state| *state = transition(std::mem::take(state)));
    }
}
