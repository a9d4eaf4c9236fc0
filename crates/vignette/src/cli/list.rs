//! Handler for the `list` command.

use std::path::PathBuf;

use vignette::{list_projects, Config, VignetteResult};

/// Print past projects, newest first.
pub fn run_list(output_dir: Option<PathBuf>, limit: usize) -> VignetteResult<()> {
    let config = Config::from_env();
    let dir = output_dir.unwrap_or(config.output_dir);

    let projects = list_projects(&dir)?;
    if projects.is_empty() {
        println!("No projects under {}", dir.display());
        return Ok(());
    }

    for metadata in projects.iter().take(limit) {
        println!(
            "{}  {}  blocks={} audio={}  \"{}\"",
            metadata.created_at.format("%Y-%m-%d %H:%M:%S"),
            metadata.folder_name,
            metadata.block_count,
            metadata.audio_file_count,
            metadata.prompt
        );
    }

    Ok(())
}
