//! Placeholder and resource provisioning for compiled scenes.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, instrument, warn};
use vignette_core::{sanitize_identifier, Block};
use vignette_error::VignetteResult;

use crate::write::write_atomic;

/// Sound effects the compiled script may cue.
pub const SOUND_EFFECTS: [&str; 5] = ["rain", "footsteps", "door", "thunder", "ambient"];

/// Background images the compiled script may show.
pub const BACKGROUNDS: [&str; 4] = ["warehouse", "dark_room", "office", "street"];

/// Emotions every character gets an image for, beyond those the script
/// actually uses.
const DEFAULT_EMOTIONS: [&str; 7] = [
    "neutral",
    "happy",
    "sad",
    "angry",
    "surprised",
    "concerned",
    "serious",
];

// One silent MPEG-1 Layer III frame header padded to frame length, so
// placeholder audio is structurally recognizable as MP3.
const MP3_FRAME_LEN: usize = 417;
const MP3_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];

fn placeholder_mp3() -> Vec<u8> {
    let mut bytes = vec![0u8; MP3_FRAME_LEN];
    bytes[..4].copy_from_slice(&MP3_HEADER);
    bytes
}

/// What provisioning put on disk, as paths relative to the project root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetManifest {
    /// Audio placeholders written for lines without real audio
    pub audio_placeholders: Vec<String>,
    /// Sound effect files guaranteed present
    pub sound_effects: Vec<String>,
    /// Character image files guaranteed present
    pub character_images: Vec<String>,
    /// Background image files guaranteed present
    pub backgrounds: Vec<String>,
}

/// Guarantee every asset the compiled scene references exists on disk.
///
/// Dialogue lines without real audio get a placeholder at the path the
/// scene expects, plus a `.txt` sidecar recording what should be there;
/// the block's `audio` field is pointed at the placeholder so persisted
/// scripts and compiled scenes reference a path that exists.
/// Sound effects, character images and backgrounds are copied from the
/// resource directory when present, else written as placeholder stand-ins.
/// Individual file failures are logged and skipped; provisioning always
/// completes.
#[instrument(skip(timeline, audio_map, resource_dir), fields(project_dir = %project_dir.display()))]
pub fn provision(
    project_dir: &Path,
    timeline: &mut [Block],
    audio_map: &HashMap<String, String>,
    resource_dir: Option<&Path>,
) -> AssetManifest {
    let mut manifest = AssetManifest::default();

    provision_audio(project_dir, timeline, audio_map, &mut manifest);
    provision_sound_effects(project_dir, resource_dir, &mut manifest);
    provision_character_images(project_dir, timeline, resource_dir, &mut manifest);
    provision_backgrounds(project_dir, resource_dir, &mut manifest);

    info!(
        audio_placeholders = manifest.audio_placeholders.len(),
        character_images = manifest.character_images.len(),
        "Asset provisioning completed"
    );

    manifest
}

fn provision_audio(
    project_dir: &Path,
    timeline: &mut [Block],
    audio_map: &HashMap<String, String>,
    manifest: &mut AssetManifest,
) {
    for block in timeline {
        let Block::Dialogue(line) = block else {
            continue;
        };
        if audio_map.contains_key(&line.id) {
            continue;
        }

        let relative = format!("audio/{}_{}.mp3", line.character, line.id);
        let target = project_dir.join(&relative);
        if target.exists() {
            line.audio = Some(relative);
            continue;
        }

        if let Err(e) = write_atomic(&target, &placeholder_mp3()) {
            warn!(path = %target.display(), error = %e, "Skipping audio placeholder");
            continue;
        }

        let sidecar = format!(
            "Character: {}\nText: {}\nBlock ID: {}\n",
            line.character, line.text, line.id
        );
        let sidecar_path = target.with_extension("txt");
        if let Err(e) = write_atomic(&sidecar_path, sidecar.as_bytes()) {
            warn!(path = %sidecar_path.display(), error = %e, "Skipping audio sidecar");
        }

        line.audio = Some(relative.clone());
        manifest.audio_placeholders.push(relative);
    }
}

fn provision_sound_effects(
    project_dir: &Path,
    resource_dir: Option<&Path>,
    manifest: &mut AssetManifest,
) {
    for effect in SOUND_EFFECTS {
        let relative = format!("audio/sfx_{}.mp3", effect);
        let note = format!(
            "{} sound effect placeholder.\nReplace with real audio for full playback.\n",
            effect
        );
        if materialize(project_dir, &relative, resource_dir, &placeholder_mp3(), &note) {
            manifest.sound_effects.push(relative);
        }
    }
}

fn provision_character_images(
    project_dir: &Path,
    timeline: &[Block],
    resource_dir: Option<&Path>,
    manifest: &mut AssetManifest,
) {
    let mut characters: BTreeSet<String> = BTreeSet::new();
    let mut emotions: BTreeSet<String> = DEFAULT_EMOTIONS
        .iter()
        .map(|e| e.to_string())
        .collect();

    for block in timeline {
        let Block::Dialogue(line) = block else {
            continue;
        };
        if line.character.eq_ignore_ascii_case("narrator") {
            continue;
        }
        characters.insert(sanitize_identifier(&line.character));
        emotions.insert(sanitize_identifier(&line.emotion));
    }

    for character in &characters {
        for emotion in &emotions {
            let relative = format!("images/characters/{}_{}.png", character, emotion);
            let note = format!(
                "Character image placeholder: {} - {}\nReplace with real art for full playback.\n",
                character, emotion
            );
            if materialize(project_dir, &relative, resource_dir, note.as_bytes(), &note) {
                manifest.character_images.push(relative);
            }
        }
    }
}

fn provision_backgrounds(
    project_dir: &Path,
    resource_dir: Option<&Path>,
    manifest: &mut AssetManifest,
) {
    for background in BACKGROUNDS {
        let relative = format!("images/backgrounds/{}.jpg", background);
        let note = format!(
            "Background placeholder: {}\nReplace with real art for full playback.\n",
            background
        );
        if materialize(project_dir, &relative, resource_dir, note.as_bytes(), &note) {
            manifest.backgrounds.push(relative);
        }
    }
}

/// Put a file at `relative` under the project: prefer a real file from the
/// resource directory, else write placeholder bytes with a `.txt` sidecar.
/// Returns false when the file could not be produced at all.
fn materialize(
    project_dir: &Path,
    relative: &str,
    resource_dir: Option<&Path>,
    placeholder: &[u8],
    note: &str,
) -> bool {
    let target = project_dir.join(relative);
    if target.exists() {
        return true;
    }

    if let Some(resources) = resource_dir {
        let source = resources.join(relative);
        if source.is_file() {
            match copy_resource(&source, &target) {
                Ok(()) => return true,
                Err(e) => {
                    warn!(
                        from = %source.display(),
                        error = %e,
                        "Resource copy failed, falling back to placeholder"
                    );
                }
            }
        }
    }

    if let Err(e) = write_atomic(&target, placeholder) {
        warn!(path = %target.display(), error = %e, "Skipping asset");
        return false;
    }

    let sidecar = target.with_extension("txt");
    if let Err(e) = write_atomic(&sidecar, note.as_bytes()) {
        warn!(path = %sidecar.display(), error = %e, "Skipping asset sidecar");
    }

    true
}

fn copy_resource(source: &Path, target: &Path) -> VignetteResult<()> {
    let bytes = fs::read(source).map_err(|e| {
        vignette_error::AssetError::new(vignette_error::AssetErrorKind::Copy {
            from: source.display().to_string(),
            to: target.display().to_string(),
            message: e.to_string(),
        })
    })?;
    write_atomic(target, &bytes)
}
