//! Imgur upload client.

use crate::{HostProvider, HostedImage, ImageHost};
use picsync_error::{HostingError, HostingErrorKind, PicsyncResult};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::instrument;

/// Imgur anonymous upload endpoint.
pub const IMGUR_UPLOAD_URL: &str = "https://api.imgur.com/3/image";

#[derive(Debug, Deserialize)]
struct ImgurEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<ImgurData>,
}

#[derive(Debug, Deserialize)]
struct ImgurData {
    link: Option<String>,
    error: Option<serde_json::Value>,
}

/// Parse an Imgur upload response.
///
/// # Examples
///
/// ```
/// use picsync_hosting::parse_imgur_response;
///
/// let body = r#"{"data":{"link":"https://i.imgur.com/a.png"},"success":true,"status":200}"#;
/// let hosted = parse_imgur_response(200, body).unwrap();
/// assert_eq!(hosted.url, "https://i.imgur.com/a.png");
/// ```
pub fn parse_imgur_response(status: u16, body: &str) -> PicsyncResult<HostedImage> {
    let envelope: ImgurEnvelope = serde_json::from_str(body).map_err(|e| {
        HostingError::new(HostingErrorKind::UploadRejected(format!(
            "imgur returned status {} with unreadable body: {}",
            status, e
        )))
    })?;

    let detail = envelope
        .data
        .as_ref()
        .and_then(|data| data.error.as_ref())
        .map(|error| match error {
            serde_json::Value::String(message) => message.clone(),
            other => other.to_string(),
        });

    if !(200..300).contains(&status) || !envelope.success {
        return Err(HostingError::new(HostingErrorKind::UploadRejected(format!(
            "imgur returned status {}: {}",
            status,
            detail.unwrap_or_else(|| "no detail".to_string())
        )))
        .into());
    }

    let url = envelope.data.and_then(|data| data.link).ok_or_else(|| {
        HostingError::new(HostingErrorKind::UploadRejected(
            "imgur response lacks data.link".to_string(),
        ))
    })?;
    Ok(HostedImage { url })
}

/// Uploads to Imgur with a registered client ID.
#[derive(Debug, Clone)]
pub struct ImgurHost {
    client: reqwest::Client,
    client_id: String,
    endpoint: String,
}

impl ImgurHost {
    /// Create a client for the public Imgur API.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if `client_id` is blank.
    pub fn new(client_id: impl Into<String>) -> PicsyncResult<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(HostingError::new(HostingErrorKind::MissingCredentials(
                "imgur client id is empty".to_string(),
            ))
            .into());
        }
        Ok(Self {
            client: reqwest::Client::new(),
            client_id,
            endpoint: IMGUR_UPLOAD_URL.to_string(),
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
impl ImageHost for ImgurHost {
    fn provider(&self) -> HostProvider {
        HostProvider::Imgur
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len(), endpoint = %self.endpoint))]
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> PicsyncResult<HostedImage> {
        tracing::debug!("Uploading image to imgur");
        let form = Form::new().part("image", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Imgur request failed: {}", e);
                HostingError::new(HostingErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read imgur response: {}", e);
            HostingError::new(HostingErrorKind::Http(format!("Failed to read body: {}", e)))
        })?;

        let hosted = parse_imgur_response(status.as_u16(), &body).inspect_err(|e| {
            tracing::error!(status = status.as_u16(), error = %e, "Imgur rejected upload");
        })?;
        tracing::info!(url = %hosted.url, "Uploaded image to imgur");
        Ok(hosted)
    }
}
