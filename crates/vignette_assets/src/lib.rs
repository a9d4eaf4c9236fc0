//! Project layout and asset provisioning.
//!
//! [`Project`] owns the on-disk folder a pipeline run writes into, with a
//! collision-free name derived from the prompt. [`provision`] walks the
//! finished timeline and guarantees that every asset the compiled scene
//! references exists on disk, substituting placeholders for media that was
//! never produced. All file writes go through a temp-file-and-rename
//! helper so a path never holds a half-written file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod project;
mod provisioner;
mod write;

pub use project::{list_projects, Project, ProjectMetadata};
pub use provisioner::{provision, AssetManifest, BACKGROUNDS, SOUND_EFFECTS};
pub use write::write_atomic;
