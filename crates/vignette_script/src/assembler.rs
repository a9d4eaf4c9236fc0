//! Timeline assembly from independently generated stage outputs.

use std::collections::HashSet;

use vignette_core::{Block, SceneBlock, ScenePlan};

/// Interleave dialogue and action blocks into one timeline.
///
/// The timeline opens with a synthetic scene block built from the plan.
/// Blocks then alternate round-robin, action before dialogue each round,
/// with leftovers from the longer stream appended in order. Relative order
/// within each stream is preserved and every input block appears exactly
/// once.
///
/// A final pass guarantees unique ids: blocks without one get
/// `block_<index>`, duplicates get a positional suffix.
///
/// # Examples
///
/// ```
/// use vignette_core::{Block, DialogueBlock, ScenePlan};
/// use vignette_script::assemble;
///
/// let plan = ScenePlan::default();
/// let dialogue = vec![Block::Dialogue(DialogueBlock {
///     text: "Hello.".into(),
///     ..DialogueBlock::default()
/// })];
/// let timeline = assemble(&plan, dialogue, Vec::new());
/// assert_eq!(timeline[0].id(), "scene_start");
/// assert_eq!(timeline.len(), 2);
/// ```
pub fn assemble(plan: &ScenePlan, dialogue: Vec<Block>, actions: Vec<Block>) -> Vec<Block> {
    let mut timeline = Vec::with_capacity(dialogue.len() + actions.len() + 1);

    timeline.push(Block::Scene(SceneBlock {
        id: "scene_start".to_string(),
        setting: plan.setting.clone(),
        description: format!(
            "Scene begins in {} with a {} atmosphere.",
            plan.setting, plan.tone
        ),
    }));

    let slots = 2 * dialogue.len().max(actions.len());
    let mut dialogue_iter = dialogue.into_iter();
    let mut actions_iter = actions.into_iter();

    for slot in 0..slots {
        if slot % 2 == 0 {
            if let Some(action) = actions_iter.next() {
                timeline.push(action);
            }
        }
        if let Some(line) = dialogue_iter.next() {
            timeline.push(line);
        }
    }

    timeline.extend(actions_iter);
    timeline.extend(dialogue_iter);

    ensure_unique_ids(&mut timeline);
    timeline
}

/// Assign `block_<index>` to blocks without an id; suffix duplicates with
/// their position instead of letting them collide downstream.
fn ensure_unique_ids(timeline: &mut [Block]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(timeline.len());

    for (index, block) in timeline.iter_mut().enumerate() {
        let id = block.id().to_string();
        let unique = if id.is_empty() {
            format!("block_{}", index)
        } else if seen.contains(&id) {
            format!("{}_{}", id, index)
        } else {
            id
        };

        block.set_id(&unique);
        seen.insert(unique);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_core::{ActionBlock, DialogueBlock};

    fn line(id: &str, text: &str) -> Block {
        Block::Dialogue(DialogueBlock {
            id: id.to_string(),
            character: "Mira".to_string(),
            text: text.to_string(),
            ..DialogueBlock::default()
        })
    }

    fn action(id: &str, description: &str) -> Block {
        Block::Action(ActionBlock {
            id: id.to_string(),
            description: description.to_string(),
            ..ActionBlock::default()
        })
    }

    #[test]
    fn scene_block_comes_first() {
        let plan = ScenePlan {
            setting: "A rainy pier".to_string(),
            tone: "tense".to_string(),
            ..ScenePlan::default()
        };
        let timeline = assemble(&plan, vec![line("d1", "Hi")], vec![action("a1", "Rain")]);

        assert_eq!(timeline[0].id(), "scene_start");
        assert_eq!(
            timeline[0].description(),
            "Scene begins in A rainy pier with a tense atmosphere."
        );
    }

    #[test]
    fn interleave_alternates_action_then_dialogue() {
        let dialogue = vec![line("d1", "one"), line("d2", "two")];
        let actions = vec![action("a1", "first"), action("a2", "second")];
        let timeline = assemble(&ScenePlan::default(), dialogue, actions);

        let ids: Vec<&str> = timeline.iter().map(Block::id).collect();
        assert_eq!(ids, vec!["scene_start", "a1", "d1", "d2", "a2"]);
    }

    #[test]
    fn every_block_appears_exactly_once_in_stream_order() {
        let dialogue: Vec<Block> = (0..5).map(|i| line(&format!("d{}", i), "x")).collect();
        let actions: Vec<Block> = (0..2).map(|i| action(&format!("a{}", i), "y")).collect();
        let timeline = assemble(&ScenePlan::default(), dialogue, actions);

        assert_eq!(timeline.len(), 8);

        let dialogue_order: Vec<&str> = timeline
            .iter()
            .filter(|b| b.is_dialogue())
            .map(Block::id)
            .collect();
        assert_eq!(dialogue_order, vec!["d0", "d1", "d2", "d3", "d4"]);

        let action_order: Vec<&str> = timeline
            .iter()
            .filter(|b| matches!(b, Block::Action(_)))
            .map(Block::id)
            .collect();
        assert_eq!(action_order, vec!["a0", "a1"]);
    }

    #[test]
    fn leftover_actions_are_appended() {
        let dialogue = vec![line("d1", "only")];
        let actions: Vec<Block> = (0..4).map(|i| action(&format!("a{}", i), "y")).collect();
        let timeline = assemble(&ScenePlan::default(), dialogue, actions);

        let ids: Vec<&str> = timeline.iter().map(Block::id).collect();
        assert_eq!(ids, vec!["scene_start", "a0", "d1", "a1", "a2", "a3"]);
    }

    #[test]
    fn empty_ids_get_positional_names() {
        let dialogue = vec![line("", "no id")];
        let timeline = assemble(&ScenePlan::default(), dialogue, Vec::new());

        assert_eq!(timeline[1].id(), "block_1");
    }

    #[test]
    fn duplicate_ids_get_positional_suffix() {
        let dialogue = vec![line("1", "first"), line("1", "second")];
        let timeline = assemble(&ScenePlan::default(), dialogue, Vec::new());

        assert_eq!(timeline[1].id(), "1");
        assert_eq!(timeline[2].id(), "1_2");
    }

    #[test]
    fn empty_inputs_yield_scene_only() {
        let timeline = assemble(&ScenePlan::default(), Vec::new(), Vec::new());
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].id(), "scene_start");
    }
}
