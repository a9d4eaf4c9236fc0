//! Timeline-to-scene-script projection.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{info, instrument};
use vignette_assets::{write_atomic, BACKGROUNDS, SOUND_EFFECTS};
use vignette_core::{sanitize_identifier, ActionBlock, Block};
use vignette_error::{CompileError, CompileErrorKind, VignetteResult};

use crate::companion;
use crate::html;
use crate::identifier::CharacterIdentifiers;

const CHARACTER_COLORS: [&str; 4] = ["#66b3ff", "#ff6b6b", "#4ecdc4", "#ffe66d"];

const CLOSING_LINE: &str = "Scene complete! Thank you for watching this generated scene.";

/// Everything the scene stage produces, as text.
#[derive(Debug, Clone)]
pub struct CompiledScene {
    /// Short name derived from the opening dialogue
    pub project_name: String,
    /// The scene script
    pub script_text: String,
    /// Self-contained preview document
    pub html_text: String,
    /// Companion engine options
    pub options_text: String,
    /// Companion GUI configuration
    pub gui_text: String,
}

/// On-disk locations of the written scene artifacts.
#[derive(Debug, Clone)]
pub struct ScenePaths {
    /// The scene script file
    pub script_file: PathBuf,
    /// The preview document
    pub preview_file: PathBuf,
}

/// Derive a short project name from the opening dialogue.
///
/// First words of the first three dialogue blocks, joined and reduced to
/// a 20-character identifier; `"vignette_scene"` when there is nothing to
/// derive from.
pub fn project_name(timeline: &[Block]) -> String {
    let mut words: Vec<String> = Vec::new();

    for block in timeline.iter().filter(|b| b.is_dialogue()).take(3) {
        if let Block::Dialogue(line) = block {
            words.extend(line.text.split_whitespace().take(3).map(str::to_string));
        }
    }

    if words.is_empty() {
        return "vignette_scene".to_string();
    }

    let joined = words.join("_").to_lowercase();
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .take(20)
        .collect();

    if cleaned.is_empty() {
        "vignette_scene".to_string()
    } else {
        cleaned
    }
}

/// Select the declared background a setting maps to.
fn background_for(setting: &str) -> &'static str {
    let lower = setting.to_lowercase();
    if lower.contains("warehouse") {
        "warehouse"
    } else if lower.contains("dark") || lower.contains("room") {
        "dark_room"
    } else {
        "black"
    }
}

fn escape_line(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Compile a timeline into a scene script and preview document.
///
/// Pure projection: no filesystem access, no network. Unknown block
/// variants are skipped; dialogue, actions, movement and environment
/// blocks each project to their script form.
///
/// # Errors
///
/// Returns an error for an empty timeline or when preview rendering
/// fails; callers degrade to [`crate::summarize`] in that case.
#[instrument(skip(timeline, audio_map), fields(blocks = timeline.len()))]
pub fn compile(
    timeline: &[Block],
    audio_map: &HashMap<String, String>,
) -> VignetteResult<CompiledScene> {
    if timeline.is_empty() {
        return Err(CompileError::new(CompileErrorKind::EmptyTimeline).into());
    }

    let name = project_name(timeline);
    let mut identifiers = CharacterIdentifiers::new();

    // First appearance order drives colors and screen positions.
    let mut ordered_characters: Vec<String> = Vec::new();
    let mut emotions_by_character: HashMap<String, BTreeSet<String>> = HashMap::new();

    for block in timeline {
        let Block::Dialogue(line) = block else {
            continue;
        };
        let ident = identifiers.resolve(&line.character);
        if !ordered_characters.contains(&ident) {
            ordered_characters.push(ident.clone());
        }
        let emotions = emotions_by_character.entry(ident).or_default();
        emotions.insert(sanitize_identifier(&line.emotion));
        emotions.insert("neutral".to_string());
    }

    let mut script = header(&ordered_characters, &emotions_by_character, &identifiers, timeline);
    script.push_str(&body(timeline, &mut identifiers, audio_map));

    script.push_str("    # Scene complete\n");
    script.push_str(&format!("    \"{}\"\n", CLOSING_LINE));
    script.push_str("    return\n");

    let html_text = html::render(&name, &script, timeline)?;

    info!(project_name = %name, "Scene compiled");

    Ok(CompiledScene {
        options_text: companion::options_rpy(&name),
        gui_text: companion::gui_rpy().to_string(),
        project_name: name,
        script_text: script,
        html_text,
    })
}

fn header(
    ordered_characters: &[String],
    emotions_by_character: &HashMap<String, BTreeSet<String>>,
    identifiers: &CharacterIdentifiers,
    timeline: &[Block],
) -> String {
    let mut out = String::from(
        "# Generated scene script\n\
         \n\
         # Transforms for character movement and positioning\n\
         transform left_enter:\n\
         \x20   xalign 0.3 yalign 1.0\n\
         \x20   alpha 0.0\n\
         \x20   ease 1.0 alpha 1.0\n\
         \n\
         transform right_enter:\n\
         \x20   xalign 0.7 yalign 1.0\n\
         \x20   alpha 0.0\n\
         \x20   ease 1.0 alpha 1.0\n\
         \n\
         transform center_focus:\n\
         \x20   xalign 0.5 yalign 1.0\n\
         \x20   ease 0.5 zoom 1.1\n\
         \n\
         transform fade_out:\n\
         \x20   alpha 1.0\n\
         \x20   ease 1.0 alpha 0.0\n\
         \n\
         # Sound effects\n",
    );

    for effect in SOUND_EFFECTS {
        out.push_str(&format!(
            "define audio.{} = \"audio/sfx_{}.mp3\"\n",
            effect, effect
        ));
    }

    out.push_str("\n# Backgrounds\n");
    for background in BACKGROUNDS {
        out.push_str(&format!(
            "image bg {} = \"images/backgrounds/{}.jpg\"\n",
            background, background
        ));
    }
    out.push_str("image bg black = \"#000000\"\n");

    out.push_str("\n# Character images\n");
    for ident in ordered_characters {
        if ident == "narrator" {
            continue;
        }
        if let Some(emotions) = emotions_by_character.get(ident) {
            for emotion in emotions {
                out.push_str(&format!(
                    "image {} {} = \"images/characters/{}_{}.png\"\n",
                    ident, emotion, ident, emotion
                ));
            }
        }
    }

    out.push_str("\n# Characters\n");
    for (ordinal, ident) in ordered_characters.iter().enumerate() {
        if ident == "narrator" {
            out.push_str("define narrator = Character(None, kind=nvl)\n");
            continue;
        }
        // Recover the display name this identifier was assigned from.
        let display = timeline
            .iter()
            .filter_map(|b| b.character())
            .find(|name| identifiers.get(name) == Some(ident.as_str()))
            .unwrap_or(ident);
        let color = CHARACTER_COLORS[ordinal % CHARACTER_COLORS.len()];
        out.push_str(&format!(
            "define {} = Character(\"{}\", color=\"{}\")\n",
            ident, display, color
        ));
    }

    out.push_str("\n# Main scene\nlabel start:\n\n");
    out
}

fn body(
    timeline: &[Block],
    identifiers: &mut CharacterIdentifiers,
    audio_map: &HashMap<String, String>,
) -> String {
    let mut out = String::new();
    let mut scene_initialized = false;
    let mut positions: HashMap<String, &'static str> = HashMap::new();

    for block in timeline {
        match block {
            Block::Scene(scene) => {
                let background = background_for(&scene.setting);
                out.push_str(&format!("    # Scene: {}\n", scene.setting));
                if !scene.description.is_empty() {
                    out.push_str(&format!("    # {}\n", scene.description));
                }
                out.push_str(&format!("    scene bg {}\n    with fade\n\n", background));
                scene_initialized = true;
            }
            Block::Dialogue(line) => {
                if !scene_initialized {
                    out.push_str("    scene bg black\n    with fade\n\n");
                    scene_initialized = true;
                }

                let ident = identifiers.resolve(&line.character);
                let emotion = sanitize_identifier(&line.emotion);

                if ident != "narrator" {
                    show_character(&mut out, &ident, &emotion, &mut positions);
                    out.push_str(&format!("    show {} {} at center_focus\n", ident, emotion));
                }

                if let Some(audio) = audio_map.get(&line.id) {
                    if !audio.ends_with(".txt") {
                        out.push_str(&format!("    voice \"{}\"\n", audio));
                    }
                }

                if ident == "narrator" {
                    out.push_str(&format!("    \"{}\"\n\n", escape_line(&line.text)));
                } else {
                    if line.emotion != "neutral" {
                        out.push_str(&format!("    # Emotion: {}\n", line.emotion));
                    }
                    out.push_str(&format!(
                        "    {} \"{}\"\n\n",
                        ident,
                        escape_line(&line.text)
                    ));
                }
            }
            Block::Movement(action) => {
                out.push_str(&format!("    # Movement: {}\n", action.description));
                sound_cues(&mut out, action);

                if let Some(character) = &action.character {
                    let ident = identifiers.resolve(character);
                    if ident != "narrator" && !positions.contains_key(&ident) {
                        show_character(&mut out, &ident, "neutral", &mut positions);
                    }
                }

                out.push_str("    with dissolve\n\n");
            }
            Block::Environment(action) => {
                out.push_str(&format!("    # Environment: {}\n", action.description));
                sound_cues(&mut out, action);
                if action
                    .environmental_impact
                    .as_ref()
                    .and_then(|impact| impact.lighting_change.as_ref())
                    .is_some()
                {
                    out.push_str("    with dissolve\n");
                }
                out.push('\n');
            }
            Block::Action(action) => {
                out.push_str(&format!("    # Action: {}\n", action.description));
                sound_cues(&mut out, action);
                out.push_str("    with dissolve\n\n");
            }
            Block::Unknown(_) => {}
        }
    }

    out
}

/// Put a character on screen, assigning left/right by appearance order.
fn show_character(
    out: &mut String,
    ident: &str,
    emotion: &str,
    positions: &mut HashMap<String, &'static str>,
) {
    if positions.contains_key(ident) {
        out.push_str(&format!("    show {} {}\n", ident, emotion));
        return;
    }

    let side = if positions.len() % 2 == 0 {
        "left"
    } else {
        "right"
    };
    positions.insert(ident.to_string(), side);
    out.push_str(&format!(
        "    show {} {} at {}_enter\n",
        ident, emotion, side
    ));
}

/// Emit sound cues for recognized keywords in the block's sound hints.
fn sound_cues(out: &mut String, action: &ActionBlock) {
    let Some(impact) = &action.environmental_impact else {
        return;
    };

    for hint in &impact.sound_implications {
        let lower = hint.to_lowercase();
        if lower.contains("rain") {
            out.push_str("    play sound audio.rain loop\n");
        } else if lower.contains("footstep") {
            out.push_str("    play sound audio.footsteps\n");
        } else if lower.contains("door") {
            out.push_str("    play sound audio.door\n");
        } else if lower.contains("thunder") {
            out.push_str("    play sound audio.thunder\n");
        } else if lower.contains("drip") {
            out.push_str("    play sound audio.ambient loop\n");
        }
    }
}

/// Write the compiled artifacts under `<project_dir>/scenes/`.
///
/// # Errors
///
/// Returns an error if the scenes directory cannot be created or any
/// artifact cannot be written.
#[instrument(skip(scene), fields(project_dir = %project_dir.display()))]
pub fn write_scene(project_dir: &Path, scene: &CompiledScene) -> VignetteResult<ScenePaths> {
    let scenes_dir = project_dir.join("scenes");

    let write = |file: &str, content: &str| -> VignetteResult<PathBuf> {
        let path = scenes_dir.join(file);
        write_atomic(&path, content.as_bytes()).map_err(|e| {
            CompileError::new(CompileErrorKind::FileWrite {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(path)
    };

    let script_file = write("script.rpy", &scene.script_text)?;
    let preview_file = write("preview.html", &scene.html_text)?;
    write("options.rpy", &scene.options_text)?;
    write("gui.rpy", &scene.gui_text)?;

    info!(script = %script_file.display(), "Scene artifacts written");

    Ok(ScenePaths {
        script_file,
        preview_file,
    })
}
