//! Asset provisioning error types.

/// Specific error conditions for asset operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetErrorKind {
    /// Failed to create a directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read a file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to copy a resource file
    #[display("Failed to copy '{}' to '{}': {}", from, to, message)]
    Copy {
        /// Source path
        from: String,
        /// Destination path
        to: String,
        /// Error message
        message: String,
    },
}

/// Error type for asset provisioning operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The specific error condition
    pub kind: AssetErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AssetError {
    /// Create a new AssetError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
