//! Cloudinary unsigned upload client.

use crate::{HostProvider, HostedImage, ImageHost};
use picsync_error::{HostingError, HostingErrorKind, PicsyncResult};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::instrument;

/// Base of the Cloudinary upload API.
pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: Option<String>,
    error: Option<CloudinaryError>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryError {
    message: String,
}

/// Parse a Cloudinary upload response.
///
/// # Examples
///
/// ```
/// use picsync_hosting::parse_cloudinary_response;
///
/// let body = r#"{"secure_url":"https://res.cloudinary.com/demo/a.png"}"#;
/// assert!(parse_cloudinary_response(200, body).is_ok());
///
/// let body = r#"{"error":{"message":"Upload preset not found"}}"#;
/// assert!(parse_cloudinary_response(400, body).is_err());
/// ```
pub fn parse_cloudinary_response(status: u16, body: &str) -> PicsyncResult<HostedImage> {
    let response: CloudinaryResponse = serde_json::from_str(body).map_err(|e| {
        HostingError::new(HostingErrorKind::UploadRejected(format!(
            "cloudinary returned status {} with unreadable body: {}",
            status, e
        )))
    })?;

    if !(200..300).contains(&status) || response.error.is_some() {
        let detail = response
            .error
            .map(|error| error.message)
            .unwrap_or_else(|| "no detail".to_string());
        return Err(HostingError::new(HostingErrorKind::UploadRejected(format!(
            "cloudinary returned status {}: {}",
            status, detail
        )))
        .into());
    }

    let url = response.secure_url.ok_or_else(|| {
        HostingError::new(HostingErrorKind::UploadRejected(
            "cloudinary response lacks secure_url".to_string(),
        ))
    })?;
    Ok(HostedImage { url })
}

/// Uploads to Cloudinary through an unsigned upload preset.
#[derive(Debug, Clone)]
pub struct CloudinaryHost {
    client: reqwest::Client,
    upload_preset: String,
    endpoint: String,
}

impl CloudinaryHost {
    /// Create a client for `cloud_name` using `upload_preset`.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if either value is blank.
    pub fn new(
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
    ) -> PicsyncResult<Self> {
        let cloud_name = cloud_name.into();
        let upload_preset = upload_preset.into();
        if cloud_name.trim().is_empty() || upload_preset.trim().is_empty() {
            return Err(HostingError::new(HostingErrorKind::MissingCredentials(
                "cloudinary needs both a cloud name and an upload preset".to_string(),
            ))
            .into());
        }
        Ok(Self {
            client: reqwest::Client::new(),
            upload_preset,
            endpoint: format!("{}/{}/image/upload", CLOUDINARY_API_BASE, cloud_name),
        })
    }

    /// Point the client at another endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Upload endpoint in use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ImageHost for CloudinaryHost {
    fn provider(&self) -> HostProvider {
        HostProvider::Cloudinary
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len(), endpoint = %self.endpoint))]
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> PicsyncResult<HostedImage> {
        tracing::debug!("Uploading image to cloudinary");
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Cloudinary request failed: {}", e);
                HostingError::new(HostingErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read cloudinary response: {}", e);
            HostingError::new(HostingErrorKind::Http(format!("Failed to read body: {}", e)))
        })?;

        let hosted = parse_cloudinary_response(status.as_u16(), &body).inspect_err(|e| {
            tracing::error!(status = status.as_u16(), error = %e, "Cloudinary rejected upload");
        })?;
        tracing::info!(url = %hosted.url, "Uploaded image to cloudinary");
        Ok(hosted)
    }
}
