//! `data:<mime>;base64,<body>` URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_getters::Getters;
use picsync_error::{ImageError, ImageErrorKind, PicsyncResult};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";
const DEFAULT_MIME: &str = "application/octet-stream";

/// Decoded `data:` URL.
///
/// Only the base64 form is supported; that is the only form picsync writes.
///
/// # Examples
///
/// ```
/// use picsync_image::DataUrl;
///
/// let url = DataUrl::parse("data:image/png;base64,AAEC").unwrap();
/// assert_eq!(url.mime(), "image/png");
/// assert_eq!(url.data(), &vec![0u8, 1, 2]);
/// assert_eq!(url.encode(), "data:image/png;base64,AAEC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct DataUrl {
    /// Media type, e.g. `image/png`
    mime: String,
    /// Decoded body
    data: Vec<u8>,
}

impl DataUrl {
    /// Wrap raw bytes with their media type.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Parse a base64 `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDataUrl` if the scheme, the comma separator or the
    /// base64 marker is missing, and `Base64` if the body does not decode.
    pub fn parse(url: &str) -> PicsyncResult<Self> {
        let rest = url.strip_prefix(SCHEME).ok_or_else(|| {
            ImageError::new(ImageErrorKind::MalformedDataUrl(format!(
                "missing '{}' scheme",
                SCHEME
            )))
        })?;

        let (header, body) = rest.split_once(',').ok_or_else(|| {
            ImageError::new(ImageErrorKind::MalformedDataUrl(
                "missing ',' before body".to_string(),
            ))
        })?;

        let mime = header.strip_suffix(BASE64_MARKER).ok_or_else(|| {
            ImageError::new(ImageErrorKind::MalformedDataUrl(format!(
                "header '{}' is not base64 encoded",
                header
            )))
        })?;
        let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };

        let data = STANDARD
            .decode(body)
            .map_err(|e| ImageError::new(ImageErrorKind::Base64(e.to_string())))?;

        Ok(Self {
            mime: mime.to_string(),
            data,
        })
    }

    /// Render back to a `data:` URL string.
    pub fn encode(&self) -> String {
        format!(
            "{}{}{},{}",
            SCHEME,
            self.mime,
            BASE64_MARKER,
            STANDARD.encode(&self.data)
        )
    }

    /// Consume the URL, returning the decoded body.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
