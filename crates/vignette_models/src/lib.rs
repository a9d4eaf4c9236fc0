//! Concrete collaborator clients for the Vignette pipeline.
//!
//! - [`GroqDriver`]: LLM text generation through Groq's OpenAI-compatible
//!   chat-completions endpoint.
//! - [`OpenAICompatibleClient`]: the shared chat-completions transport any
//!   OpenAI-shaped provider can reuse.
//! - [`ElevenLabsClient`]: voice creation and per-line text-to-speech.
//!
//! All clients read their API keys from the environment and surface
//! failures as typed errors; fallback policy lives with the callers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod elevenlabs;
mod groq;
mod openai_compat;

pub use elevenlabs::ElevenLabsClient;
pub use groq::{GroqDriver, DEFAULT_MODEL};
pub use openai_compat::OpenAICompatibleClient;
