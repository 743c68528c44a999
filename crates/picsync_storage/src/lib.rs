//! Chunked, content-addressed record storage for picsync.
//!
//! This crate layers large-payload storage over a document store that caps
//! the size of each document. Payloads that fit are stored inline in their
//! record; larger ones are split into chunk documents owned by the record.
//!
//! # Features
//!
//! - **Content addressing**: payloads fingerprinted with SHA-256 for deduplication
//! - **Chunk codec**: bounded, ordered splitting and verified reassembly
//! - **Pluggable backends**: `RecordStore` trait with in-memory and filesystem stores
//! - **Atomic batches**: every multi-document change commits all-or-nothing
//! - **Live updates**: consumer-owned subscriptions yield snapshots with deltas
//!
//! # Example
//!
//! ```rust
//! use picsync_core::RecordContent;
//! use picsync_storage::{MemoryRecordStore, RecordStore, WriteBatch, fingerprint, join, split_into_chunks};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryRecordStore::default();
//! let payload = "data:image/png;base64,".to_string() + &"A".repeat(64);
//! let id = store.new_record_id();
//!
//! let chunks = split_into_chunks(&payload, 32)?;
//! let mut batch = WriteBatch::new();
//! for chunk in &chunks {
//!     batch = batch.put_chunk(id.clone(), chunk.clone());
//! }
//! let batch = batch.put_record(
//!     id.clone(),
//!     fingerprint(&payload),
//!     RecordContent::Chunked { chunk_count: chunks.len() as u32 },
//! );
//! store.commit(batch).await?;
//!
//! let joined = join(&id, store.chunks(&id).await?, chunks.len() as u32)?;
//! assert_eq!(joined, payload);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod chunking;
mod filesystem;
mod fingerprint;
mod limits;
mod memory;
mod state;
mod store;
mod subscription;

pub use batch::{Committed, WriteBatch, WriteOp};
pub use chunking::{
    DEFAULT_CHUNK_CAPACITY_BYTES, DOCUMENT_CAPACITY_BYTES, METADATA_HEADROOM_BYTES,
    chunk_count_for, join, split, split_into_chunks,
};
pub use filesystem::FileSystemRecordStore;
pub use fingerprint::fingerprint;
pub use limits::StoreLimits;
pub use memory::MemoryRecordStore;
pub use picsync_error::{StorageError, StorageErrorKind};
pub use store::RecordStore;
pub use subscription::{ChangeKind, RecordChange, Snapshot, Subscription};
