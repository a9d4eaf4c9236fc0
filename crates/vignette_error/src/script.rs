//! Script generation error types.

/// Specific error conditions for script generation operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScriptErrorKind {
    /// Generation driver is not configured
    #[display("No generation driver configured")]
    DriverNotConfigured,
    /// Driver call failed
    #[display("Driver call failed: {}", _0)]
    DriverFailed(String),
    /// Driver call exceeded its deadline
    #[display("Driver call timed out after {}s", _0)]
    DriverTimeout(u64),
    /// Driver returned an empty response
    #[display("Driver returned an empty response for stage '{}'", _0)]
    EmptyResponse(String),
    /// No JSON could be recovered from the driver response
    #[display("No JSON found in response (length: {})", _0)]
    NoJsonFound(usize),
    /// Recovered JSON did not match the expected shape
    #[display("Failed to parse JSON: {}", _0)]
    JsonParse(String),
    /// Failed to persist a script artifact
    #[display("Failed to write script file '{}': {}", path, message)]
    FileWrite {
        /// Target path
        path: String,
        /// Error message
        message: String,
    },
}

/// Error type for script generation operations.
///
/// # Examples
///
/// ```
/// use vignette_error::{ScriptError, ScriptErrorKind};
///
/// let err = ScriptError::new(ScriptErrorKind::EmptyResponse("dialogue".into()));
/// assert!(format!("{}", err).contains("dialogue"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    /// The specific error condition
    pub kind: ScriptErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
