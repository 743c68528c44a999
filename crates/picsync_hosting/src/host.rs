//! Image host trait.

use picsync_error::PicsyncResult;
use serde::{Deserialize, Serialize};

/// Link to an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", url)]
pub struct HostedImage {
    /// Publicly reachable URL of the image
    pub url: String,
}

/// Supported hosts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HostProvider {
    /// api.imgur.com
    #[default]
    Imgur,
    /// api.cloudinary.com
    Cloudinary,
}

/// Uploads image bytes to a third-party host.
#[async_trait::async_trait]
pub trait ImageHost: Send + Sync {
    /// Which host this is.
    fn provider(&self) -> HostProvider;

    /// Upload `bytes` under `filename` and return the hosted link.
    ///
    /// # Errors
    ///
    /// Returns `Http` if the request cannot be sent, and `UploadRejected`
    /// carrying the host's detail on a non-success status or a response
    /// without the expected URL field.
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> PicsyncResult<HostedImage>;
}
