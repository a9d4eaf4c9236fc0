//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vignette - prompt-to-scene generation with voice synthesis
#[derive(Parser, Debug)]
#[command(name = "vignette")]
#[command(about = "Generate playable scenes with voiced dialogue from a text prompt", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a scene from a prompt
    Generate {
        /// The scene prompt
        prompt: String,

        /// Reference text to ground generation, repeatable
        #[arg(long = "references")]
        references: Vec<String>,

        /// Directory project folders are created under
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Directory of real media to copy instead of placeholders
        #[arg(long)]
        resource_dir: Option<PathBuf>,
    },

    /// List generated projects, newest first
    List {
        /// Directory project folders live under
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Maximum number of projects to display
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}
