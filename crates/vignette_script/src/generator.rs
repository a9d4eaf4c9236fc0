//! The three-stage script generator.
//!
//! Each stage makes one driver call under a deadline and falls back to a
//! fixed static result on any failure: no driver, timeout, empty response,
//! or unparsable output. Generation therefore never fails outright; at
//! worst it degrades to a generic but playable script.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};
use vignette_assets::write_atomic;
use vignette_core::{
    extract_json, parse_block_list, parse_json, ActionBlock, Block, DialogueBlock, GenerateRequest,
    Message, Role, SceneBlock, ScenePlan, VoiceTraits,
};
use vignette_error::{ScriptError, ScriptErrorKind, VignetteResult};
use vignette_interface::SceneDriver;

use crate::assembler::assemble;
use crate::prompts;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn conversational_traits() -> VoiceTraits {
    VoiceTraits {
        age_range: Some("adult".to_string()),
        gender: Some("neutral".to_string()),
        voice_style: Some("conversational".to_string()),
        accent: None,
        voice_id: None,
    }
}

/// Per-script statistics persisted alongside the block list.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptAnalysis {
    /// Total block count, all variants
    pub total_blocks: usize,
    /// Dialogue block count
    pub dialogue_blocks: usize,
    /// Action-family block count
    pub action_blocks: usize,
    /// Distinct character names, sorted
    pub characters: Vec<String>,
}

impl ScriptAnalysis {
    /// Compute statistics over an assembled timeline.
    pub fn from_timeline(timeline: &[Block]) -> Self {
        let dialogue_blocks = timeline.iter().filter(|b| b.is_dialogue()).count();
        let action_blocks = timeline
            .iter()
            .filter(|b| {
                matches!(
                    b,
                    Block::Action(_) | Block::Movement(_) | Block::Environment(_)
                )
            })
            .count();

        let mut characters: Vec<String> = timeline
            .iter()
            .filter_map(Block::character)
            .map(str::to_string)
            .collect();
        characters.sort();
        characters.dedup();

        Self {
            total_blocks: timeline.len(),
            dialogue_blocks,
            action_blocks,
            characters,
        }
    }
}

/// Drives a [`SceneDriver`] through the interpret, dialogue and action
/// stages and assembles the results into a timeline.
///
/// The driver is optional; without one, every stage serves its fallback
/// immediately.
pub struct ScriptGenerator {
    driver: Option<Arc<dyn SceneDriver>>,
    timeout: Duration,
}

impl ScriptGenerator {
    /// Creates a generator around an optional driver.
    pub fn new(driver: Option<Arc<dyn SceneDriver>>) -> Self {
        if driver.is_none() {
            warn!("No generation driver configured; all stages will use fallbacks");
        }

        Self {
            driver,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One driver call under the configured deadline.
    async fn call_driver(
        &self,
        stage: &str,
        system: &str,
        user: String,
        max_tokens: u32,
        temperature: f32,
    ) -> VignetteResult<String> {
        let driver = self
            .driver
            .as_ref()
            .ok_or_else(|| ScriptError::new(ScriptErrorKind::DriverNotConfigured))?;

        let request = GenerateRequest {
            messages: vec![
                Message::new(Role::System, system),
                Message::new(Role::User, user),
            ],
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        };

        let response = tokio::time::timeout(self.timeout, driver.generate(&request))
            .await
            .map_err(|_| {
                ScriptError::new(ScriptErrorKind::DriverTimeout(self.timeout.as_secs()))
            })??;

        if response.text.trim().is_empty() {
            return Err(ScriptError::new(ScriptErrorKind::EmptyResponse(stage.to_string())).into());
        }

        Ok(response.text)
    }

    async fn try_interpret(&self, prompt: &str, references: &[String]) -> VignetteResult<ScenePlan> {
        let mut user = format!("Prompt: {}", prompt);
        if !references.is_empty() {
            user.push_str("\nReference materials:\n");
            for reference in references {
                user.push_str(reference);
                user.push('\n');
            }
        }

        let text = self
            .call_driver("interpret", prompts::INTERPRET_SYSTEM, user, 1000, 0.7)
            .await?;

        match extract_json(&text).and_then(|json| parse_json::<ScenePlan>(&json)) {
            Ok(plan) => Ok(plan),
            // The model answered with prose; keep it as the conflict rather
            // than discarding the call entirely.
            Err(_) => Ok(ScenePlan {
                setting: "Unknown location".to_string(),
                characters: vec!["Character A".to_string(), "Character B".to_string()],
                conflict: truncate(&text, 200),
                tone: "neutral".to_string(),
                events: vec![
                    "Scene begins".to_string(),
                    "Characters interact".to_string(),
                    "Scene concludes".to_string(),
                ],
            }),
        }
    }

    /// Interpret the prompt into a scene plan.
    ///
    /// Never fails: driver problems produce a generic plan carrying the
    /// prompt as its conflict.
    #[instrument(skip(self, references), fields(prompt_length = prompt.len()))]
    pub async fn interpret(&self, prompt: &str, references: &[String]) -> ScenePlan {
        match self.try_interpret(prompt, references).await {
            Ok(plan) => {
                info!(
                    setting = %plan.setting,
                    characters = plan.characters.len(),
                    "Prompt interpreted"
                );
                plan
            }
            Err(e) => {
                warn!(error = %e, "Prompt interpretation failed, using fallback plan");
                fallback_plan(prompt)
            }
        }
    }

    async fn try_dialogue(&self, plan: &ScenePlan) -> VignetteResult<Vec<Block>> {
        let plan_json = serde_json::to_string_pretty(plan)
            .map_err(|e| ScriptError::new(ScriptErrorKind::JsonParse(e.to_string())))?;

        let text = self
            .call_driver(
                "dialogue",
                prompts::DIALOGUE_SYSTEM,
                format!("Scene plan: {}", plan_json),
                1500,
                0.8,
            )
            .await?;

        parse_block_list(&text)
    }

    /// Generate the scene's spoken lines.
    ///
    /// Never fails: driver problems produce two generic lines spoken by
    /// the plan's first two characters.
    #[instrument(skip(self, plan))]
    pub async fn generate_dialogue(&self, plan: &ScenePlan) -> Vec<Block> {
        match self.try_dialogue(plan).await {
            Ok(blocks) => {
                info!(blocks = blocks.len(), "Dialogue generated");
                blocks
            }
            Err(e) => {
                warn!(error = %e, "Dialogue generation failed, using fallback lines");
                fallback_dialogue(plan)
            }
        }
    }

    async fn try_actions(&self, plan: &ScenePlan, dialogue: &[Block]) -> VignetteResult<Vec<Block>> {
        let plan_json = serde_json::to_string_pretty(plan)
            .map_err(|e| ScriptError::new(ScriptErrorKind::JsonParse(e.to_string())))?;
        let dialogue_json = serde_json::to_string_pretty(dialogue)
            .map_err(|e| ScriptError::new(ScriptErrorKind::JsonParse(e.to_string())))?;

        let text = self
            .call_driver(
                "actions",
                prompts::ACTION_SYSTEM,
                format!(
                    "Scene plan: {}\n\nDialogue: {}\n\nGenerate appropriate actions and visual elements for this scene.",
                    plan_json, dialogue_json
                ),
                1500,
                0.7,
            )
            .await?;

        parse_block_list(&text)
    }

    /// Generate the scene's actions and visual beats.
    ///
    /// Never fails: driver problems produce three generic actions built
    /// from the plan's setting and tone.
    #[instrument(skip(self, plan, dialogue))]
    pub async fn generate_actions(&self, plan: &ScenePlan, dialogue: &[Block]) -> Vec<Block> {
        match self.try_actions(plan, dialogue).await {
            Ok(blocks) => {
                info!(blocks = blocks.len(), "Actions generated");
                blocks
            }
            Err(e) => {
                warn!(error = %e, "Action generation failed, using fallback actions");
                fallback_actions(plan)
            }
        }
    }

    /// Run all three stages and assemble the timeline.
    ///
    /// A run whose stages all came back empty (a driver returning valid but
    /// vacant JSON) yields the fixed four-block fallback script instead of
    /// a timeline with nothing to play.
    #[instrument(skip(self, references), fields(prompt_length = prompt.len()))]
    pub async fn generate_script(
        &self,
        prompt: &str,
        references: &[String],
    ) -> (ScenePlan, Vec<Block>) {
        let plan = self.interpret(prompt, references).await;
        let dialogue = self.generate_dialogue(&plan).await;
        let actions = self.generate_actions(&plan, &dialogue).await;

        let timeline = assemble(&plan, dialogue, actions);

        if !timeline.iter().any(Block::is_dialogue) {
            warn!("Assembled timeline has no dialogue, using fallback script");
            return (plan, fallback_script(prompt));
        }

        info!(blocks = timeline.len(), "Script generation completed");
        (plan, timeline)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn fallback_plan(prompt: &str) -> ScenePlan {
    ScenePlan {
        setting: "A generic location".to_string(),
        characters: vec!["Speaker".to_string(), "Listener".to_string()],
        conflict: prompt.to_string(),
        tone: "conversational".to_string(),
        events: vec![
            "Introduction".to_string(),
            "Main discussion".to_string(),
            "Conclusion".to_string(),
        ],
    }
}

fn fallback_dialogue(plan: &ScenePlan) -> Vec<Block> {
    vec![
        Block::Dialogue(DialogueBlock {
            id: "1".to_string(),
            character: plan.character_or(0, "Character A"),
            text: format!("Hello! Let me tell you about {}.", nonempty(&plan.conflict, "our situation")),
            emotion: "friendly".to_string(),
            traits: conversational_traits(),
            audio: None,
        }),
        Block::Dialogue(DialogueBlock {
            id: "2".to_string(),
            character: plan.character_or(1, "Listener"),
            text: "That's interesting! Tell me more.".to_string(),
            emotion: "curious".to_string(),
            traits: conversational_traits(),
            audio: None,
        }),
    ]
}

fn fallback_actions(plan: &ScenePlan) -> Vec<Block> {
    let descriptions = [
        format!("Scene opens in {}", plan.setting),
        "Characters begin their interaction".to_string(),
        format!("The atmosphere is {}", plan.tone),
    ];

    descriptions
        .into_iter()
        .enumerate()
        .map(|(i, description)| {
            Block::Action(ActionBlock {
                id: format!("action_{}", i + 1),
                description,
                ..ActionBlock::default()
            })
        })
        .collect()
}

/// Fixed four-block script used when generation produces nothing playable.
fn fallback_script(prompt: &str) -> Vec<Block> {
    vec![
        Block::Scene(SceneBlock {
            id: "1".to_string(),
            setting: "Generic location".to_string(),
            description: "A scene begins to unfold.".to_string(),
        }),
        Block::Dialogue(DialogueBlock {
            id: "2".to_string(),
            character: "Narrator".to_string(),
            text: format!("Welcome to this scene about: {}", prompt),
            emotion: "neutral".to_string(),
            traits: conversational_traits(),
            audio: None,
        }),
        Block::Action(ActionBlock {
            id: "3".to_string(),
            description: "The scene continues as planned.".to_string(),
            ..ActionBlock::default()
        }),
        Block::Dialogue(DialogueBlock {
            id: "4".to_string(),
            character: "Narrator".to_string(),
            text: "This concludes our generated scene.".to_string(),
            emotion: "conclusive".to_string(),
            traits: conversational_traits(),
            audio: None,
        }),
    ]
}

fn nonempty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> VignetteResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ScriptError::new(ScriptErrorKind::JsonParse(e.to_string())))?;

    write_atomic(path, json.as_bytes()).map_err(|e| {
        ScriptError::new(ScriptErrorKind::FileWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;

    Ok(())
}

/// Persist the scene plan, the block list, and summary statistics under
/// `<project_dir>/scripts/`.
///
/// # Errors
///
/// Returns an error if the scripts directory cannot be created or any of
/// the three files cannot be written.
#[instrument(skip(plan, timeline), fields(project_dir = %project_dir.display()))]
pub fn persist_script(
    project_dir: &Path,
    plan: &ScenePlan,
    timeline: &[Block],
) -> VignetteResult<()> {
    let scripts_dir = project_dir.join("scripts");

    write_json(&scripts_dir.join("scene_plan.json"), plan)?;
    write_json(&scripts_dir.join("script.json"), &timeline)?;
    write_json(
        &scripts_dir.join("script_analysis.json"),
        &ScriptAnalysis::from_timeline(timeline),
    )?;

    info!(path = %scripts_dir.display(), "Script files saved");
    Ok(())
}
