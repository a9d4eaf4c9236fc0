//! Shared data types for the Vignette pipeline.
//!
//! This crate defines the block model every pipeline stage exchanges, the
//! scene plan produced by prompt interpretation, the generation
//! request/response types spoken by LLM drivers, and utilities for
//! recovering structured JSON from loosely formatted model output.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod extraction;
mod handle;
mod ident;
mod plan;
mod request;

pub use block::{
    ActionBlock, Block, DialogueBlock, EnvironmentalImpact, SceneBlock, VoiceTraits,
    UNKNOWN_CHARACTER,
};
pub use extraction::{extract_json, parse_block_list, parse_json};
pub use handle::VoiceHandle;
pub use ident::sanitize_identifier;
pub use plan::ScenePlan;
pub use request::{GenerateRequest, GenerateResponse, Message, Role};
