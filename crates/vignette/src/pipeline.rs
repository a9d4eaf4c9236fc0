//! The end-to-end generation pipeline.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use vignette_assets::{list_projects, provision, write_atomic, AssetManifest, Project, ProjectMetadata};
use vignette_core::{Block, ScenePlan};
use vignette_error::VignetteResult;
use vignette_interface::{SceneDriver, VoiceSynthesizer};
use vignette_models::{ElevenLabsClient, GroqDriver};
use vignette_scene::{compile, summarize, write_scene, ScenePaths};
use vignette_script::{persist_script, ScriptAnalysis, ScriptGenerator};
use vignette_voice::{AudioGenerator, VoiceRegistry};

use crate::Config;

/// Everything one pipeline run produced.
#[derive(Debug)]
pub struct SceneOutput {
    /// The project folder the run wrote into
    pub project: Project,
    /// The interpreted scene plan
    pub plan: ScenePlan,
    /// The assembled timeline, with audio paths filled in
    pub timeline: Vec<Block>,
    /// Block id to relative audio path for lines with real audio
    pub audio_map: HashMap<String, String>,
    /// Assets guaranteed present on disk
    pub manifest: AssetManifest,
    /// Compiled scene artifact paths, when compilation succeeded
    pub scene: Option<ScenePaths>,
    /// Plain-text summary path, when compilation was degraded
    pub summary_file: Option<PathBuf>,
    /// The metadata record written to the project folder
    pub metadata: ProjectMetadata,
}

/// Prompt-to-scene pipeline.
///
/// Stages run in a fixed order: interpret, dialogue, actions, assembly,
/// audio synthesis, asset provisioning, scene compilation. Every stage
/// degrades rather than aborting the run; only project folder creation
/// and final persistence can fail it.
pub struct Pipeline {
    generator: ScriptGenerator,
    audio: AudioGenerator,
    output_dir: PathBuf,
    resource_dir: Option<PathBuf>,
}

impl Pipeline {
    /// Build a pipeline from explicit collaborators.
    pub fn new(
        driver: Option<Arc<dyn SceneDriver>>,
        synthesizer: Option<Arc<dyn VoiceSynthesizer>>,
        output_dir: PathBuf,
        resource_dir: Option<PathBuf>,
    ) -> Self {
        let registry = Arc::new(VoiceRegistry::new(synthesizer.clone()));

        Self {
            generator: ScriptGenerator::new(driver),
            audio: AudioGenerator::new(synthesizer, registry),
            output_dir,
            resource_dir,
        }
    }

    /// Build a pipeline from configuration, wiring up whichever remote
    /// collaborators have keys.
    pub fn from_config(config: &Config) -> Self {
        let driver: Option<Arc<dyn SceneDriver>> = config
            .groq_api_key
            .clone()
            .map(|key| Arc::new(GroqDriver::with_api_key(key, config.model.clone())) as _);

        let synthesizer: Option<Arc<dyn VoiceSynthesizer>> = config
            .elevenlabs_api_key
            .clone()
            .map(|key| Arc::new(ElevenLabsClient::with_api_key(key)) as _);

        if driver.is_none() {
            warn!("No GROQ_API_KEY configured, scripts will use static fallbacks");
        }
        if synthesizer.is_none() {
            warn!("No ELEVENLABS_API_KEY configured, audio will be placeholders");
        }

        Self::new(driver, synthesizer, config.output_dir.clone(), config.resource_dir.clone())
    }

    /// Run the full pipeline for one prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the project folder cannot be created or the
    /// final script and metadata files cannot be written. Generation,
    /// synthesis and compilation failures degrade instead.
    #[instrument(skip(self, references), fields(prompt_length = prompt.len()))]
    pub async fn run(&self, prompt: &str, references: &[String]) -> VignetteResult<SceneOutput> {
        let project = Project::create(&self.output_dir, prompt)?;

        let (plan, mut timeline) = self.generator.generate_script(prompt, references).await;

        let audio_map = self.audio.generate(&project.root, &mut timeline).await;

        let manifest = provision(
            &project.root,
            &mut timeline,
            &audio_map,
            self.resource_dir.as_deref(),
        );

        // Persisted after the audio and provisioning stages so every saved
        // block carries an on-disk audio path, placeholder or real.
        persist_script(&project.root, &plan, &timeline)?;

        let (scene, summary_file) = match compile(&timeline, &audio_map) {
            Ok(compiled) => {
                let paths = write_scene(&project.root, &compiled)?;
                (Some(paths), None)
            }
            Err(e) => {
                warn!(error = %e, "Scene compilation failed, writing summary instead");
                let summary = summarize(&timeline, &audio_map);
                let path = project.root.join("scene_summary.txt");
                write_atomic(&path, summary.as_bytes())?;
                (None, Some(path))
            }
        };

        let analysis = ScriptAnalysis::from_timeline(&timeline);
        let metadata = ProjectMetadata {
            prompt: prompt.to_string(),
            created_at: Utc::now(),
            folder_name: project.name.clone(),
            block_count: analysis.total_blocks,
            dialogue_count: analysis.dialogue_blocks,
            character_count: analysis.characters.len(),
            audio_file_count: audio_map.len(),
        };
        project.write_metadata(&metadata)?;

        info!(
            project = %project.name,
            blocks = metadata.block_count,
            audio_files = metadata.audio_file_count,
            compiled = scene.is_some(),
            "Pipeline run completed"
        );

        Ok(SceneOutput {
            project,
            plan,
            timeline,
            audio_map,
            manifest,
            scene,
            summary_file,
            metadata,
        })
    }

    /// List past runs under the output directory, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory exists but cannot be read.
    pub fn list(&self) -> VignetteResult<Vec<ProjectMetadata>> {
        list_projects(&self.output_dir)
    }
}
