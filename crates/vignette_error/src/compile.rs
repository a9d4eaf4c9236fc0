//! Scene compilation error types.

/// Specific error conditions for scene compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CompileErrorKind {
    /// The timeline contained no blocks
    #[display("Cannot compile an empty timeline")]
    EmptyTimeline,
    /// Failed to render the HTML preview template
    #[display("Preview template rendering failed: {}", _0)]
    Template(String),
    /// Failed to serialize the timeline for embedding
    #[display("Timeline serialization failed: {}", _0)]
    Serialization(String),
    /// Failed to write a compiled artifact
    #[display("Failed to write compiled file '{}': {}", path, message)]
    FileWrite {
        /// Target path
        path: String,
        /// Error message
        message: String,
    },
}

/// Error type for scene compilation operations.
///
/// # Examples
///
/// ```
/// use vignette_error::{CompileError, CompileErrorKind};
///
/// let err = CompileError::new(CompileErrorKind::EmptyTimeline);
/// assert!(format!("{}", err).contains("empty timeline"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Compile Error: {} at line {} in {}", kind, line, file)]
pub struct CompileError {
    /// The specific error condition
    pub kind: CompileErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CompileError {
    /// Create a new CompileError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompileErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
