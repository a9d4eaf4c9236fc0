//! Per-line audio materialization.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use vignette_core::{Block, DialogueBlock};
use vignette_error::{VignetteResult, VoiceError, VoiceErrorKind};
use vignette_interface::VoiceSynthesizer;

use crate::registry::{VoiceRegistry, VoiceSession};

const WORDS_PER_MINUTE: f64 = 150.0;
const MIN_DURATION_SECS: f64 = 2.0;

/// Estimate line duration in seconds from its word count.
///
/// Used for player timing before real audio exists: words at a 150 wpm
/// speaking rate plus a second of padding, never under two seconds.
///
/// # Examples
///
/// ```
/// use vignette_voice::estimate_duration;
///
/// assert_eq!(estimate_duration("Hi."), 2.0);
/// assert!(estimate_duration("one two three four five six seven eight") > 2.0);
/// ```
pub fn estimate_duration(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    let duration = (words / WORDS_PER_MINUTE) * 60.0 + 1.0;
    duration.max(MIN_DURATION_SECS)
}

/// Synthesizes one audio file per dialogue block.
///
/// Audio paths are deterministic (`audio/<character>_<block id>.mp3`
/// relative to the project directory); an existing file is recorded and
/// never regenerated, so re-running a project is cheap. Synthesis failures
/// are logged and skipped, leaving the block for the asset provisioner's
/// placeholder.
pub struct AudioGenerator {
    synthesizer: Option<Arc<dyn VoiceSynthesizer>>,
    registry: Arc<VoiceRegistry>,
}

impl AudioGenerator {
    /// Creates a generator around an optional synthesizer and a shared
    /// registry.
    pub fn new(
        synthesizer: Option<Arc<dyn VoiceSynthesizer>>,
        registry: Arc<VoiceRegistry>,
    ) -> Self {
        Self {
            synthesizer,
            registry,
        }
    }

    /// The audio path for a dialogue block, relative to the project dir.
    pub fn audio_path(block: &DialogueBlock) -> String {
        format!("audio/{}_{}.mp3", block.character, block.id)
    }

    /// Synthesize audio for every dialogue block in the timeline.
    ///
    /// Returns a map from block id to the relative audio path for every
    /// line that has real audio on disk afterwards. Blocks are updated in
    /// place: `audio` records the path, and the resolved voice id is
    /// cached into the block's traits.
    #[instrument(skip(self, timeline), fields(project_dir = %project_dir.display()))]
    pub async fn generate(
        &self,
        project_dir: &Path,
        timeline: &mut [Block],
    ) -> HashMap<String, String> {
        let mut audio_map = HashMap::new();
        // One session per run: a character's voice is pinned for the
        // whole timeline even if the shared caches change underneath.
        let session = self.registry.session();

        for block in timeline.iter_mut() {
            let Block::Dialogue(line) = block else {
                continue;
            };
            if line.text.trim().is_empty() {
                continue;
            }

            match self.generate_line(project_dir, line, &session).await {
                Ok(Some(path)) => {
                    audio_map.insert(line.id.clone(), path);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        block_id = %line.id,
                        character = %line.character,
                        error = %e,
                        "Line synthesis failed, leaving block for placeholder"
                    );
                }
            }
        }

        info!(lines = audio_map.len(), "Audio generation completed");
        audio_map
    }

    /// Synthesize one line, honoring existing files.
    async fn generate_line(
        &self,
        project_dir: &Path,
        line: &mut DialogueBlock,
        session: &VoiceSession,
    ) -> VignetteResult<Option<String>> {
        let relative = Self::audio_path(line);
        let target = project_dir.join(&relative);

        if target.exists() {
            line.audio = Some(relative.clone());
            return Ok(Some(relative));
        }

        let Some(synthesizer) = &self.synthesizer else {
            return Ok(None);
        };

        let handle = session
            .resolve(&line.character, &line.traits, &line.emotion)
            .await;

        let bytes = synthesizer.synthesize(&line.text, &handle).await?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                VoiceError::new(VoiceErrorKind::AudioWrite {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })
            })?;
        }
        fs::write(&target, &bytes).map_err(|e| {
            VoiceError::new(VoiceErrorKind::AudioWrite {
                path: target.display().to_string(),
                message: e.to_string(),
            })
        })?;

        line.audio = Some(relative.clone());
        line.traits.voice_id = Some(handle.id);

        Ok(Some(relative))
    }

    /// Regenerate one line from scratch.
    ///
    /// Removes any existing audio file, drops the character's cached
    /// voice, and synthesizes again.
    #[instrument(skip(self, line), fields(block_id = %line.id))]
    pub async fn regenerate(
        &self,
        project_dir: &Path,
        line: &mut DialogueBlock,
    ) -> VignetteResult<Option<String>> {
        let target = project_dir.join(Self::audio_path(line));
        if target.exists() {
            fs::remove_file(&target).map_err(|e| {
                VoiceError::new(VoiceErrorKind::AudioWrite {
                    path: target.display().to_string(),
                    message: e.to_string(),
                })
            })?;
        }

        let session = self.registry.session();
        session.invalidate(&line.character).await;
        line.traits.voice_id = None;

        self.generate_line(project_dir, line, &session).await
    }
}
