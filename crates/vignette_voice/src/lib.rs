//! Voice resolution and per-line audio synthesis.
//!
//! [`VoiceRegistry`] holds process-wide voice caches; each pipeline run
//! opens a [`VoiceSession`] over it that pins a character to one voice for
//! the whole run, creating a voice once per distinct description and
//! falling back to fixed defaults when the synthesis service is
//! unavailable. [`AudioGenerator`] walks a
//! timeline's dialogue blocks and materializes one audio file per line at
//! a deterministic path, skipping lines whose audio already exists.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audio;
mod description;
mod registry;

pub use audio::{estimate_duration, AudioGenerator};
pub use description::build_voice_description;
pub use registry::{VoiceRegistry, VoiceSession};
