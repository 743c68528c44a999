//! Immutable view state shared between the sync session and renderers.
//!
//! Every transition consumes a state and returns the next one, so renderers
//! observe a sequence of complete values instead of poking shared variables.

use crate::{Fingerprint, ImageRecord, RecordId, Rotation};
use derive_getters::Getters;
use std::sync::Arc;

/// Identity of the stored record the current image was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveImage {
    /// Key of the source record
    pub record_id: RecordId,
    /// Fingerprint the record had when it was loaded
    pub fingerprint: Fingerprint,
}

impl From<&ImageRecord> for ActiveImage {
    fn from(record: &ImageRecord) -> Self {
        Self {
            record_id: record.id().clone(),
            fingerprint: record.fingerprint().clone(),
        }
    }
}

/// Payload currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedImage {
    /// Record the payload was materialized from, `None` for a local pick
    pub origin: Option<ActiveImage>,
    /// The payload itself
    pub payload: Arc<str>,
}

impl DisplayedImage {
    /// A payload loaded from a stored record.
    pub fn from_record(origin: ActiveImage, payload: impl Into<Arc<str>>) -> Self {
        Self {
            origin: Some(origin),
            payload: payload.into(),
        }
    }

    /// A payload picked locally and not yet synced.
    pub fn local(payload: impl Into<Arc<str>>) -> Self {
        Self {
            origin: None,
            payload: payload.into(),
        }
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NoticeLevel {
    /// Informational
    #[display("info")]
    Info,
    /// An operation failed
    #[display("error")]
    Error,
}

/// Message surfaced to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("[{}] {}", level, message)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Human-readable text
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Failure notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Snapshot of everything a renderer needs.
///
/// # Examples
///
/// ```
/// use picsync_core::{Rotation, ViewState};
///
/// let state = ViewState::default().rotated_clockwise().with_busy(true);
/// assert_eq!(*state.rotation(), Rotation::Quarter);
/// assert!(*state.busy());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ViewState {
    /// Known records, newest `order` first
    records: Vec<ImageRecord>,
    /// Index into `records` of the selected image
    current: Option<usize>,
    /// Record the current image was loaded from
    active: Option<ActiveImage>,
    /// Pending rotation of the displayed image
    rotation: Rotation,
    /// Payload on screen
    displayed: Option<DisplayedImage>,
    /// Whether an operation is in flight
    busy: bool,
    /// Last message for the user
    notice: Option<Notice>,
}

impl ViewState {
    /// Record under the current index.
    pub fn current_record(&self) -> Option<&ImageRecord> {
        self.current.and_then(|index| self.records.get(index))
    }

    /// Reconcile with the latest store snapshot.
    ///
    /// The current index is re-derived from the active record's key, never
    /// carried over from the previous list, so a stale or reordered
    /// notification cannot leave the selection pointing at the wrong record.
    pub fn with_snapshot(self, records: Vec<ImageRecord>) -> Self {
        let position = self
            .active
            .as_ref()
            .and_then(|active| records.iter().position(|r| r.id() == &active.record_id));

        let current = match (position, &self.active) {
            (Some(position), _) => Some(position),
            // Active record vanished: fall back to its neighbour
            (None, Some(_)) if !records.is_empty() => {
                Some(self.current.unwrap_or(0).min(records.len() - 1))
            }
            (None, Some(_)) => None,
            // Nothing on screen yet: surface the newest record
            (None, None) if self.displayed.is_none() && !records.is_empty() => Some(0),
            (None, None) => None,
        };
        let active = current.and_then(|index| records.get(index)).map(ActiveImage::from);

        Self {
            records,
            current,
            active,
            ..self
        }
    }

    /// Select the record at `index`; out-of-range indices leave the state as is.
    pub fn select(self, index: usize) -> Self {
        let Some(record) = self.records.get(index) else {
            return self;
        };
        let active = ActiveImage::from(record);
        Self {
            current: Some(index),
            active: Some(active),
            rotation: Rotation::Upright,
            ..self
        }
    }

    /// Index the next step forward would select, wrapping around.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.records.len();
        (len > 0).then(|| self.current.map_or(0, |i| (i + 1) % len))
    }

    /// Index the next step back would select, wrapping around.
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.records.len();
        (len > 0).then(|| self.current.map_or(len - 1, |i| (i + len - 1) % len))
    }

    /// Select the next record, wrapping around.
    pub fn next(self) -> Self {
        match self.next_index() {
            Some(index) => self.select(index),
            None => self,
        }
    }

    /// Select the previous record, wrapping around.
    pub fn previous(self) -> Self {
        match self.previous_index() {
            Some(index) => self.select(index),
            None => self,
        }
    }

    /// Show a freshly picked local image that no record backs yet.
    pub fn with_local_image(self, payload: impl Into<Arc<str>>) -> Self {
        Self {
            current: None,
            active: None,
            rotation: Rotation::Upright,
            displayed: Some(DisplayedImage::local(payload)),
            ..self
        }
    }

    /// Record that `payload` is now stored under `active`.
    pub fn after_sync(self, active: ActiveImage, payload: impl Into<Arc<str>>) -> Self {
        let current = self
            .records
            .iter()
            .position(|r| r.id() == &active.record_id);
        Self {
            current,
            displayed: Some(DisplayedImage::from_record(active.clone(), payload)),
            active: Some(active),
            rotation: Rotation::Upright,
            ..self
        }
    }

    /// Whether the displayed payload no longer matches the current record.
    pub fn needs_reload(&self) -> bool {
        let Some(record) = self.current_record() else {
            return false;
        };
        match self.displayed.as_ref().and_then(|d| d.origin.as_ref()) {
            Some(origin) => {
                origin.record_id != *record.id() || origin.fingerprint != *record.fingerprint()
            }
            None => self.displayed.is_none(),
        }
    }

    /// Replace the pending rotation.
    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Add a quarter turn clockwise.
    pub fn rotated_clockwise(self) -> Self {
        let rotation = self.rotation.clockwise();
        self.with_rotation(rotation)
    }

    /// Add a quarter turn counter-clockwise.
    pub fn rotated_counter_clockwise(self) -> Self {
        let rotation = self.rotation.counter_clockwise();
        self.with_rotation(rotation)
    }

    /// Toggle the busy indicator.
    pub fn with_busy(self, busy: bool) -> Self {
        Self { busy, ..self }
    }

    /// Surface a notice.
    pub fn with_notice(self, notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..self
        }
    }

    /// Dismiss the notice.
    pub fn without_notice(self) -> Self {
        Self {
            notice: None,
            ..self
        }
    }

    /// Put a payload on screen.
    pub fn with_displayed(self, displayed: DisplayedImage) -> Self {
        Self {
            displayed: Some(displayed),
            ..self
        }
    }

    /// Clear the screen.
    pub fn without_displayed(self) -> Self {
        Self {
            displayed: None,
            ..self
        }
    }
}
