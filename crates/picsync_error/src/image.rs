//! Image decoding and data URL errors.

/// Specific image error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ImageErrorKind {
    /// Payload is not a well-formed `data:` URL
    #[display("Malformed data URL: {}", _0)]
    MalformedDataUrl(String),

    /// Base64 body could not be decoded
    #[display("Invalid base64 body: {}", _0)]
    Base64(String),

    /// Image bytes could not be decoded or re-encoded
    #[display("Image codec failure: {}", _0)]
    Codec(String),
}

/// Image error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Image Error: {} at line {} in {}", kind, line, file)]
pub struct ImageError {
    kind: ImageErrorKind,
    line: u32,
    file: &'static str,
}

impl ImageError {
    /// Create a new image error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ImageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ImageErrorKind {
        &self.kind
    }
}
