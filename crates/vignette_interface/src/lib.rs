//! Trait definitions for Vignette's external collaborators.
//!
//! The pipeline consumes two kinds of remote service: LLM text generation
//! (scene plans, dialogue, actions) and voice synthesis (custom voice
//! creation plus per-line text-to-speech). Both are modeled as async traits
//! so production clients and test mocks share a seam.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{SceneDriver, VoiceSynthesizer};
pub use types::CustomVoice;
