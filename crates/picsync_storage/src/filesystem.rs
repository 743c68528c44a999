//! Filesystem-backed record store.
//!
//! Keeps the document set in memory and persists all of it as one JSON file
//! after every commit, so the directory survives restarts.

use crate::state::{Published, StoreState, now_millis};
use crate::{Committed, RecordStore, StoreLimits, Subscription, WriteBatch};
use picsync_core::{Chunk, Fingerprint, ImageRecord, RecordId};
use picsync_error::{PicsyncResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

/// Name of the document file inside the store directory.
const RECORDS_FILE: &str = "records.json";

/// Record store persisted to a directory.
///
/// Layout:
///
/// ```text
/// {base_path}/
/// └── records.json   (records, chunk documents, version and clock)
/// ```
///
/// # Features
///
/// - **Atomic batches**: the new state is written to a temp file and renamed
///   over `records.json`; the in-memory state only changes once that succeeds
/// - **Restartable**: reopening the directory restores every record and chunk
/// - **Live**: commits are published to subscribers like the in-memory store
#[derive(Debug)]
pub struct FileSystemRecordStore {
    base_path: PathBuf,
    state: RwLock<StoreState>,
    publisher: watch::Sender<Arc<Published>>,
    limits: StoreLimits,
}

impl FileSystemRecordStore {
    /// Open or create a store in `base_path`.
    ///
    /// Creates the directory if it doesn't exist and loads `records.json`
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created, or the document file
    /// cannot be read or parsed.
    #[tracing::instrument(skip(base_path), fields(path))]
    pub fn open(base_path: impl Into<PathBuf>, limits: StoreLimits) -> PicsyncResult<Self> {
        let base_path = base_path.into();
        tracing::Span::current().record("path", tracing::field::display(base_path.display()));

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        let file = base_path.join(RECORDS_FILE);
        let state = match std::fs::read(&file) {
            Ok(bytes) => parse_state(&file, &bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    file.display(),
                    e
                )))
                .into());
            }
        };

        tracing::info!(
            path = %base_path.display(),
            version = state.version(),
            "Opened filesystem record store"
        );

        let (publisher, _) = watch::channel(state.published());
        Ok(Self {
            base_path,
            state: RwLock::new(state),
            publisher,
            limits,
        })
    }

    /// Directory holding the document file.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Pick up commits another process wrote to the directory.
    ///
    /// Replaces the in-memory state and publishes it to subscribers when the
    /// file on disk carries a newer version. Returns whether it did.
    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    pub async fn reload(&self) -> PicsyncResult<bool> {
        let Some(loaded) = self.read_disk().await? else {
            return Ok(false);
        };
        let mut state = self.state.write().await;
        Ok(self.adopt_if_newer(&mut *state, loaded))
    }

    /// Current contents of `records.json`, `None` if nothing was written yet.
    async fn read_disk(&self) -> PicsyncResult<Option<StoreState>> {
        let file = self.base_path.join(RECORDS_FILE);
        match tokio::fs::read(&file).await {
            Ok(bytes) => parse_state(&file, &bytes).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                file.display(),
                e
            )))
            .into()),
        }
    }

    /// Replace `state` with `loaded` when another writer got further.
    fn adopt_if_newer(&self, state: &mut StoreState, loaded: StoreState) -> bool {
        if loaded.version() <= state.version() {
            return false;
        }
        tracing::info!(
            from = state.version(),
            to = loaded.version(),
            "Reloaded record store from disk"
        );
        *state = loaded;
        self.publisher.send_replace(state.published());
        true
    }

    /// Write `state` to disk, temp file first, then rename into place.
    async fn persist(&self, state: &StoreState) -> PicsyncResult<()> {
        let bytes = serde_json::to_vec(state).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(e.to_string()))
        })?;

        let path = self.base_path.join(RECORDS_FILE);
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Persisted record store");
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for FileSystemRecordStore {
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
        Ok(self.state.read().await.find_by_fingerprint(fingerprint))
    }

    async fn list(&self) -> PicsyncResult<Vec<ImageRecord>> {
        Ok(self.state.read().await.list())
    }

    async fn chunks(&self, id: &RecordId) -> PicsyncResult<Vec<Chunk>> {
        Ok(self.state.read().await.chunks(id))
    }

    #[tracing::instrument(skip(self, batch), fields(ops = batch.len(), path = %self.base_path.display()))]
    async fn commit(&self, batch: WriteBatch) -> PicsyncResult<Committed> {
        let mut state = self.state.write().await;
        if batch.is_empty() {
            return Ok(Committed {
                version: state.version(),
                stamp: state.clock(),
            });
        }

        // Build on top of commits other handles made to the directory
        if let Some(loaded) = self.read_disk().await? {
            self.adopt_if_newer(&mut *state, loaded);
        }

        if let Err(e) = state.validate(&batch, &self.limits) {
            tracing::warn!(error = %e, "Rejected write batch");
            return Err(e);
        }

        let mut next = state.clone();
        let committed = next.apply(batch, now_millis());
        self.persist(&next).await?;
        *state = next;
        self.publisher.send_replace(state.published());

        tracing::info!(
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

fn parse_state(file: &Path, bytes: &[u8]) -> PicsyncResult<StoreState> {
    serde_json::from_slice(bytes).map_err(|e| {
        StorageError::new(StorageErrorKind::Serialization(format!(
            "{}: {}",
            file.display(),
            e
        )))
        .into()
    })
}
