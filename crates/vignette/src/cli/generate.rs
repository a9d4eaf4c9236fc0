//! Handler for the `generate` command.

use std::path::PathBuf;

use vignette::{Config, Pipeline, VignetteResult};

/// Run the pipeline for one prompt and report what it produced.
pub async fn run_generate(
    prompt: &str,
    references: &[String],
    output_dir: Option<PathBuf>,
    resource_dir: Option<PathBuf>,
) -> VignetteResult<()> {
    let mut config = Config::from_env();
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = resource_dir {
        config.resource_dir = Some(dir);
    }

    let pipeline = Pipeline::from_config(&config);
    let output = pipeline.run(prompt, references).await?;

    println!("Project: {}", output.project.root.display());
    println!(
        "Blocks: {} ({} dialogue, {} characters)",
        output.metadata.block_count,
        output.metadata.dialogue_count,
        output.metadata.character_count
    );
    println!("Audio files: {}", output.metadata.audio_file_count);

    match (&output.scene, &output.summary_file) {
        (Some(scene), _) => {
            println!("Script: {}", scene.script_file.display());
            println!("Preview: {}", scene.preview_file.display());
        }
        (None, Some(summary)) => {
            println!("Compilation degraded, summary: {}", summary.display());
        }
        (None, None) => {}
    }

    Ok(())
}
