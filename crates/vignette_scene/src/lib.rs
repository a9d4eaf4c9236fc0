//! Scene compilation.
//!
//! [`compile`] projects an assembled timeline into a Ren'Py-flavored
//! scene script and a self-contained HTML preview with a client-side
//! player. Compilation is pure; [`write_scene`] puts the artifacts on
//! disk. When compilation fails, [`summarize`] provides a plain-text
//! rendition so a run always produces something reviewable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod companion;
mod compiler;
mod html;
mod identifier;
mod summary;

pub use compiler::{compile, project_name, write_scene, CompiledScene, ScenePaths};
pub use identifier::CharacterIdentifiers;
pub use summary::summarize;
