//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Record not found for the given key
    #[display("Record not found: {}", _0)]
    NotFound(String),
    /// Fewer chunks were retrieved than the record declares
    #[display(
        "Incomplete data for record {}: expected {} chunks, found {}",
        record,
        expected,
        found
    )]
    IncompleteData {
        /// Key of the record being materialized
        record: String,
        /// Chunk count declared by the record
        expected: u32,
        /// Chunk documents actually retrieved
        found: u32,
    },
    /// Chunk parts do not form the sequence `0..chunk_count`
    #[display("Corrupt chunk sequence: {}", _0)]
    CorruptChunks(String),
    /// A single document write exceeds the per-document cap
    #[display("Document of {} bytes exceeds the {} byte cap", size, limit)]
    DocumentTooLarge {
        /// Size of the rejected document in bytes
        size: usize,
        /// Per-document cap in bytes
        limit: usize,
    },
    /// Fingerprint is not a 64 character lowercase hex digest
    #[display("Invalid fingerprint: {}", _0)]
    InvalidFingerprint(String),
    /// Invalid storage configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
    /// Failed to (de)serialize stored documents
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
    /// A store read, write, or subscription failed
    #[display("Store operation failed: {}", _0)]
    StoreOperationFailed(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use picsync_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("f3a9".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
