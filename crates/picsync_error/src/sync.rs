//! Sync orchestration error types.

/// Kinds of sync errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SyncErrorKind {
    /// Candidate payload exceeds the size policy
    #[display("Image too large: {} bytes exceeds the {} byte limit", size, limit)]
    PayloadTooLarge {
        /// Size of the candidate payload in bytes
        size: usize,
        /// Limit imposed by the active size policy
        limit: usize,
    },
    /// Candidate payload is empty
    #[display("Refusing to sync an empty payload")]
    EmptyPayload,
    /// Size policy is inconsistent with the store
    #[display("Invalid size policy: {}", _0)]
    InvalidPolicy(String),
    /// No image is selected for an operation that needs one
    #[display("No image selected")]
    NothingSelected,
}

/// Sync error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Sync Error: {} at line {} in {}", kind, line, file)]
pub struct SyncError {
    /// The kind of error that occurred
    pub kind: SyncErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SyncError {
    /// Create a new sync error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SyncErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
