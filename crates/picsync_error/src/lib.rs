//! Error types for picsync.
//!
//! This crate provides the error types shared by every picsync crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use picsync_error::{PicsyncResult, StorageError, StorageErrorKind};
//!
//! fn load_record() -> PicsyncResult<String> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("abc".to_string())))?
//! }
//!
//! match load_record() {
//!     Ok(payload) => println!("Got: {}", payload),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod hosting;
mod image;
mod storage;
mod sync;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{PicsyncError, PicsyncErrorKind, PicsyncResult};
pub use hosting::{HostingError, HostingErrorKind};
pub use image::{ImageError, ImageErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use sync::{SyncError, SyncErrorKind};
