//! Image host uploads for picsync.
//!
//! Instead of embedding an image in the record store, a user can upload it to
//! a third-party host and sync the resulting link. Two hosts are supported:
//!
//! - **Imgur**: multipart upload authenticated with a client ID header
//! - **Cloudinary**: unsigned multipart upload naming an upload preset
//!
//! Response parsing is exposed as pure functions so it can be checked
//! without network access.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cloudinary;
mod host;
mod imgur;

pub use cloudinary::{CLOUDINARY_API_BASE, CloudinaryHost, parse_cloudinary_response};
pub use host::{HostProvider, HostedImage, ImageHost};
pub use imgur::{IMGUR_UPLOAD_URL, ImgurHost, parse_imgur_response};
pub use picsync_error::{HostingError, HostingErrorKind};
