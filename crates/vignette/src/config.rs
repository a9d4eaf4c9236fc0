//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;

use tracing::info;
use vignette_models::DEFAULT_MODEL;

/// Runtime configuration, read once at startup.
///
/// API keys are optional: a missing key disables the corresponding
/// collaborator and the pipeline degrades to fallbacks and placeholders
/// instead of failing.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider key; absent means static fallback scripts
    pub groq_api_key: Option<String>,
    /// Voice synthesis key; absent means placeholder audio
    pub elevenlabs_api_key: Option<String>,
    /// Model identifier for the scene driver
    pub model: String,
    /// Directory project folders are created under
    pub output_dir: PathBuf,
    /// Optional directory of real media to copy instead of placeholders
    pub resource_dir: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the environment, loading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let groq_api_key = nonempty_var("GROQ_API_KEY");
        let elevenlabs_api_key = nonempty_var("ELEVENLABS_API_KEY");

        let config = Self {
            groq_api_key,
            elevenlabs_api_key,
            model: nonempty_var("VIGNETTE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            output_dir: nonempty_var("VIGNETTE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("results")),
            resource_dir: nonempty_var("VIGNETTE_RESOURCE_DIR").map(PathBuf::from),
        };

        info!(
            driver = config.groq_api_key.is_some(),
            synthesizer = config.elevenlabs_api_key.is_some(),
            model = %config.model,
            output_dir = %config.output_dir.display(),
            "Configuration loaded"
        );

        config
    }
}

fn nonempty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
