//! Configuration error types.

/// Ways loading the layered configuration can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A source (bundled defaults, a file, the environment) could not be read
    #[display("Failed to read configuration from {}: {}", source_name, detail)]
    Load {
        /// Which source failed
        source_name: String,
        /// What went wrong
        detail: String,
    },
    /// The merged sources do not describe a valid `PicsyncConfig`
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
}

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// What failed
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use picsync_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::new(ConfigErrorKind::Load {
    ///     source_name: "./picsync.toml".to_string(),
    ///     detail: "permission denied".to_string(),
    /// });
    /// assert!(err.to_string().contains("./picsync.toml"));
    /// ```
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
