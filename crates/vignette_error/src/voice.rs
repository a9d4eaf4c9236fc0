//! Voice service error types.

/// Specific error conditions for voice operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum VoiceErrorKind {
    /// Voice service is not configured
    #[display("Voice service not configured")]
    NotConfigured,
    /// Voice creation request failed
    #[display("Voice creation failed for '{}': {}", description, message)]
    CreationFailed {
        /// The voice description that was requested
        description: String,
        /// Error message
        message: String,
    },
    /// The service returned no usable preview
    #[display("Voice service returned no previews for '{}'", _0)]
    NoPreviews(String),
    /// Text-to-speech synthesis failed
    #[display("Synthesis failed for voice '{}': {}", voice_id, message)]
    SynthesisFailed {
        /// Voice handle the synthesis targeted
        voice_id: String,
        /// Error message
        message: String,
    },
    /// Remote voice listing or deletion failed
    #[display("Voice management call failed: {}", _0)]
    ManagementFailed(String),
    /// Failed to write synthesized audio to disk
    #[display("Failed to write audio file '{}': {}", path, message)]
    AudioWrite {
        /// Target path
        path: String,
        /// Error message
        message: String,
    },
}

/// Error type for voice operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Voice Error: {} at line {} in {}", kind, line, file)]
pub struct VoiceError {
    /// The specific error condition
    pub kind: VoiceErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl VoiceError {
    /// Create a new VoiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: VoiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
