//! Vignette turns a free-text prompt into a playable generated scene.
//!
//! The pipeline interprets the prompt with an LLM, generates dialogue and
//! action blocks, assembles them into a timeline, synthesizes per-line
//! voice audio, provisions every referenced asset, and compiles a scene
//! script with an HTML preview. Each stage degrades gracefully when its
//! collaborator is unavailable, so a run always produces a reviewable
//! project folder.
//!
//! # Examples
//!
//! ```no_run
//! use vignette::{Config, Pipeline};
//!
//! # async fn run() -> vignette::VignetteResult<()> {
//! let pipeline = Pipeline::from_config(&Config::from_env());
//! let output = pipeline.run("Two detectives argue in a warehouse", &[]).await?;
//! println!("Scene written to {}", output.project.root.display());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod pipeline;

pub use config::Config;
pub use pipeline::{Pipeline, SceneOutput};

pub use vignette_assets::{list_projects, Project, ProjectMetadata};
pub use vignette_core::{Block, ScenePlan};
pub use vignette_error::{VignetteError, VignetteResult};
pub use vignette_interface::{SceneDriver, VoiceSynthesizer};
pub use vignette_models::{ElevenLabsClient, GroqDriver, DEFAULT_MODEL};
