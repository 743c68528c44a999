//! picsync - content-addressed image sync
//!
//! picsync stores images in a document store that caps the size of each
//! document. Payloads are fingerprinted for deduplication, split into chunk
//! documents when they outgrow a single document, and committed in atomic
//! batches. Every client subscribed to the store sees the image list update
//! live.
//!
//! # Features
//!
//! - **Content addressing**: SHA-256 fingerprints, one record per distinct image
//! - **Chunked storage**: bounded chunk documents with verified reassembly
//! - **Atomic syncs**: update in place, touch or create, never half-written
//! - **Live view state**: immutable `ViewState` published on every transition
//! - **Image hosts**: optional Imgur or Cloudinary upload before syncing a link
//!
//! # Quick Start
//!
//! ```rust
//! use picsync::{MemoryRecordStore, Rotation, Session, SizePolicy, SyncOrchestrator};
//! use std::sync::Arc;
//!
//! # async fn example() -> picsync::PicsyncResult<()> {
//! let store = Arc::new(MemoryRecordStore::default());
//! let session = Session::new(SyncOrchestrator::new(store, SizePolicy::default())?);
//!
//! session.load_local("https://i.imgur.com/abc.png");
//! session.rotate(Rotation::Upright);
//! let report = session.sync().await;
//! assert!(report.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `picsync_error` - Error types
//! - `picsync_core` - Records, chunks, fingerprints, rotation, view state
//! - `picsync_storage` - Chunk codec, record stores, subscriptions
//! - `picsync_sync` - Size policy, sync orchestrator, session
//! - `picsync_image` - Data URLs and rotation
//! - `picsync_hosting` - Imgur and Cloudinary uploads
//!
//! This crate re-exports everything and adds configuration and tracing setup
//! for the `picsync` binary.

pub use picsync_core::*;
pub use picsync_error::*;
pub use picsync_hosting::*;
pub use picsync_image::*;
pub use picsync_storage::*;
pub use picsync_sync::*;

pub mod config;
pub mod telemetry;

pub use config::{HostingConfig, PicsyncConfig, PolicyConfig, PolicyMode, StoreConfig};
pub use telemetry::{LogFormat, init_tracing};
