//! Sync orchestration for picsync.
//!
//! [`SyncOrchestrator`] decides, for a canonical payload, whether to update
//! the active record in place, surface an existing record with the same
//! fingerprint, or create a new record, and commits each choice as one
//! atomic batch. [`Session`] wraps an orchestrator with an immutable
//! [`ViewState`](picsync_core::ViewState) that renderers watch.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod orchestrator;
mod policy;
mod session;

pub use orchestrator::{SyncOrchestrator, SyncOutcome, SyncReport};
pub use picsync_error::{SyncError, SyncErrorKind};
pub use policy::SizePolicy;
pub use session::Session;
