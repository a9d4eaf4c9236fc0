//! Scene plan produced by prompt interpretation.

use serde::{Deserialize, Serialize};

fn default_setting() -> String {
    "Unknown location".to_string()
}

fn default_tone() -> String {
    "neutral".to_string()
}

/// Structured interpretation of the free-text prompt.
///
/// Every field is defaulted so a partially parsed interpretation still
/// yields a usable plan.
///
/// # Examples
///
/// ```
/// use vignette_core::ScenePlan;
///
/// let plan: ScenePlan = serde_json::from_str(r#"{"characters": ["Mira"]}"#).unwrap();
/// assert_eq!(plan.setting, "Unknown location");
/// assert_eq!(plan.tone, "neutral");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePlan {
    /// Where the scene takes place
    #[serde(default = "default_setting")]
    pub setting: String,
    /// Character names appearing in the scene
    #[serde(default)]
    pub characters: Vec<String>,
    /// The central conflict or topic
    #[serde(default)]
    pub conflict: String,
    /// Overall atmosphere label
    #[serde(default = "default_tone")]
    pub tone: String,
    /// Ordered beats the scene should follow
    #[serde(default)]
    pub events: Vec<String>,
}

impl Default for ScenePlan {
    fn default() -> Self {
        Self {
            setting: default_setting(),
            characters: Vec::new(),
            conflict: String::new(),
            tone: default_tone(),
            events: Vec::new(),
        }
    }
}

impl ScenePlan {
    /// The nth character name, or a generic fallback when the plan names
    /// fewer characters than the script needs.
    pub fn character_or(&self, index: usize, fallback: &str) -> String {
        self.characters
            .get(index)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let plan: ScenePlan = serde_json::from_str("{}").unwrap();
        assert_eq!(plan.setting, "Unknown location");
        assert_eq!(plan.tone, "neutral");
        assert!(plan.characters.is_empty());
    }

    #[test]
    fn character_fallback() {
        let plan = ScenePlan {
            characters: vec!["Mira".to_string()],
            ..ScenePlan::default()
        };
        assert_eq!(plan.character_or(0, "Speaker"), "Mira");
        assert_eq!(plan.character_or(1, "Listener"), "Listener");
    }
}
