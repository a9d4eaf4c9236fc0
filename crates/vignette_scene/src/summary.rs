//! Plain-text fallback rendition of a timeline.

use std::collections::HashMap;

use vignette_core::Block;

/// Summarize a timeline block by block.
///
/// Used when scene compilation fails: the result is plain text a person
/// can read to review the generated scene, never an error.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use vignette_core::{Block, DialogueBlock};
/// use vignette_scene::summarize;
///
/// let timeline = vec![Block::Dialogue(DialogueBlock {
///     id: "1".into(),
///     character: "Mira".into(),
///     text: "Hello.".into(),
///     ..DialogueBlock::default()
/// })];
/// let summary = summarize(&timeline, &HashMap::new());
/// assert!(summary.contains("Mira"));
/// ```
pub fn summarize(timeline: &[Block], audio_map: &HashMap<String, String>) -> String {
    let mut out = String::from("Generated Scene Summary\n");
    out.push_str(&"=".repeat(30));
    out.push_str("\n\n");

    for (index, block) in timeline.iter().enumerate() {
        let id = if block.id().is_empty() {
            "unknown"
        } else {
            block.id()
        };
        out.push_str(&format!("Block {} (ID: {}):\n", index + 1, id));

        match block {
            Block::Scene(scene) => {
                out.push_str(&format!("  Scene: {}\n", scene.setting));
                if !scene.description.is_empty() {
                    out.push_str(&format!("  {}\n", scene.description));
                }
            }
            Block::Dialogue(line) => {
                out.push_str(&format!("  Character: {} ({})\n", line.character, line.emotion));
                out.push_str(&format!("  Dialogue: \"{}\"\n", line.text));
                if let Some(audio) = audio_map.get(&line.id) {
                    out.push_str(&format!("  Audio: {}\n", audio));
                }
            }
            Block::Action(action) | Block::Movement(action) | Block::Environment(action) => {
                out.push_str(&format!("  {}: {}\n", block.type_name(), action.description));
            }
            Block::Unknown(_) => {
                out.push_str("  (unrecognized block)\n");
            }
        }

        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_core::{ActionBlock, DialogueBlock};

    #[test]
    fn every_block_is_represented() {
        let timeline = vec![
            Block::Dialogue(DialogueBlock {
                id: "1".to_string(),
                character: "Mira".to_string(),
                text: "Hello.".to_string(),
                ..DialogueBlock::default()
            }),
            Block::Action(ActionBlock {
                id: "2".to_string(),
                description: "Rain falls.".to_string(),
                ..ActionBlock::default()
            }),
        ];

        let mut audio_map = HashMap::new();
        audio_map.insert("1".to_string(), "audio/Mira_1.mp3".to_string());

        let summary = summarize(&timeline, &audio_map);
        assert!(summary.contains("Block 1 (ID: 1)"));
        assert!(summary.contains("Dialogue: \"Hello.\""));
        assert!(summary.contains("Audio: audio/Mira_1.mp3"));
        assert!(summary.contains("Rain falls."));
    }

    #[test]
    fn empty_timeline_still_summarizes() {
        let summary = summarize(&[], &HashMap::new());
        assert!(summary.contains("Generated Scene Summary"));
    }
}
