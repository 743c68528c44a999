//! Top-level error wrapper types.

use crate::{ConfigError, HostingError, ImageError, StorageError, SyncError};

/// Every error a picsync operation can produce.
///
/// # Examples
///
/// ```
/// use picsync_error::{PicsyncError, SyncError, SyncErrorKind};
///
/// let sync_err = SyncError::new(SyncErrorKind::EmptyPayload);
/// let err: PicsyncError = sync_err.into();
/// assert!(format!("{}", err).contains("Sync Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PicsyncErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Record store error
    #[from(StorageError)]
    Storage(StorageError),
    /// Sync orchestration error
    #[from(SyncError)]
    Sync(SyncError),
    /// Image host error
    #[from(HostingError)]
    Hosting(HostingError),
    /// Image decoding error
    #[from(ImageError)]
    Image(ImageError),
}

/// picsync error with kind discrimination.
///
/// # Examples
///
/// ```
/// use picsync_error::{ConfigError, ConfigErrorKind, PicsyncResult};
///
/// fn might_fail() -> PicsyncResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Parse("missing field `store`".to_string())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Picsync Error: {}", _0)]
pub struct PicsyncError(Box<PicsyncErrorKind>);

impl PicsyncError {
    /// Create a new error from a kind.
    pub fn new(kind: PicsyncErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PicsyncErrorKind {
        &self.0
    }

    /// Whether a materialize found fewer chunks than the record declares.
    pub fn is_incomplete_data(&self) -> bool {
        matches!(
            self.kind(),
            PicsyncErrorKind::Storage(StorageError {
                kind: crate::StorageErrorKind::IncompleteData { .. },
                ..
            })
        )
    }

    /// Whether the size policy rejected the payload.
    pub fn is_payload_too_large(&self) -> bool {
        matches!(
            self.kind(),
            PicsyncErrorKind::Sync(SyncError {
                kind: crate::SyncErrorKind::PayloadTooLarge { .. },
                ..
            })
        )
    }

    /// Whether an image host refused the upload.
    pub fn is_upload_rejected(&self) -> bool {
        matches!(
            self.kind(),
            PicsyncErrorKind::Hosting(HostingError {
                kind: crate::HostingErrorKind::UploadRejected(_),
                ..
            })
        )
    }

    /// Whether the record store reported a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind(),
            PicsyncErrorKind::Storage(StorageError {
                kind: crate::StorageErrorKind::NotFound(_),
                ..
            })
        )
    }
}

// Generic From implementation for any type that converts to PicsyncErrorKind
impl<T> From<T> for PicsyncError
where
    T: Into<PicsyncErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for picsync operations.
///
/// # Examples
///
/// ```
/// use picsync_error::{PicsyncResult, SyncError, SyncErrorKind};
///
/// fn candidate(payload: &str) -> PicsyncResult<&str> {
///     if payload.is_empty() {
///         Err(SyncError::new(SyncErrorKind::EmptyPayload))?
///     }
///     Ok(payload)
/// }
/// ```
pub type PicsyncResult<T> = std::result::Result<T, PicsyncError>;
