//! Error types for third-party image hosts.

/// Error kinds for image host uploads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum HostingErrorKind {
    /// HTTP request failed: {0}
    #[display("HTTP request failed: {}", _0)]
    Http(String),

    /// Host rejected the upload: {0}
    #[display("Upload rejected: {}", _0)]
    UploadRejected(String),

    /// Host credentials are missing or malformed: {0}
    #[display("Missing credentials: {}", _0)]
    MissingCredentials(String),
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Hosting Error: {} at line {} in {}", kind, line, file)]
pub struct HostingError {
    /// The error kind
    pub kind: HostingErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl HostingError {
    /// Create a new HostingError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HostingErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
