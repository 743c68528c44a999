//! Image payload handling for picsync.
//!
//! Payloads are stored as `data:` URLs. This crate parses and builds them,
//! and produces the canonical payload for an image: the bytes after any
//! pending rotation, which is what gets fingerprinted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod canonical;
mod data_url;

pub use canonical::{canonical_payload, rotate_payload};
pub use data_url::DataUrl;
pub use picsync_error::{ImageError, ImageErrorKind};
