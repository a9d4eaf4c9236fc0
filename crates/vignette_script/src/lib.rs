//! Script generation stages and timeline assembly.
//!
//! [`ScriptGenerator`] turns a free-text prompt into an ordered block
//! timeline in three driver calls (interpret, dialogue, actions), each with
//! a one-shot static fallback so generation always produces a playable
//! script. [`assemble`] interleaves the stage outputs into a single
//! timeline with guaranteed-unique block ids.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod generator;
mod prompts;

pub use assembler::assemble;
pub use generator::{persist_script, ScriptAnalysis, ScriptGenerator};
