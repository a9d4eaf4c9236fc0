//! Trait definitions for generation and synthesis backends.

use crate::CustomVoice;
use async_trait::async_trait;
use vignette_core::{GenerateRequest, GenerateResponse, VoiceHandle};
use vignette_error::VignetteResult;

/// Core trait for LLM text generation backends.
///
/// This is the minimal interface the script stages need: send a
/// conversation, get text back. Provider-specific concerns (endpoints,
/// auth, response envelopes) live behind it.
#[async_trait]
pub trait SceneDriver: Send + Sync {
    /// Generate model output for a conversation.
    async fn generate(&self, req: &GenerateRequest) -> VignetteResult<GenerateResponse>;

    /// Provider name (e.g., "groq").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "llama-3.1-8b-instant").
    fn model_name(&self) -> &str;
}

/// Trait for voice creation and per-line speech synthesis.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    /// Create a voice from a human-readable description.
    ///
    /// `name` is a display label (usually the character name); the
    /// description is the deterministic cache key.
    async fn create_voice(&self, description: &str, name: &str) -> VignetteResult<VoiceHandle>;

    /// Synthesize one line of speech with a previously created voice.
    async fn synthesize(&self, text: &str, handle: &VoiceHandle) -> VignetteResult<Vec<u8>>;

    /// List voices currently registered on the service.
    async fn list_voices(&self) -> VignetteResult<Vec<CustomVoice>>;

    /// Delete a voice from the service.
    async fn delete_voice(&self, voice_id: &str) -> VignetteResult<()>;
}
