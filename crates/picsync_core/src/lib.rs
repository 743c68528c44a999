//! Core data types for picsync.
//!
//! This crate provides the record, chunk, fingerprint and view-state types
//! shared by the storage, sync and CLI crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fingerprint;
mod record;
mod record_id;
mod rotation;
mod view;

pub use fingerprint::Fingerprint;
pub use record::{Chunk, ImageRecord, RecordContent};
pub use record_id::RecordId;
pub use rotation::Rotation;
pub use view::{ActiveImage, DisplayedImage, Notice, NoticeLevel, ViewState};
