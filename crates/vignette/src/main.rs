//! Vignette CLI binary.
//!
//! This binary provides command-line access to the generation pipeline:
//! - Generate a scene from a text prompt
//! - List past generated projects

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{run_generate, run_list, Cli, Commands};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Execute the requested command
    match cli.command {
        Commands::Generate {
            prompt,
            references,
            output_dir,
            resource_dir,
        } => {
            run_generate(&prompt, &references, output_dir, resource_dir).await?;
        }

        Commands::List { output_dir, limit } => {
            run_list(output_dir, limit)?;
        }
    }

    Ok(())
}
