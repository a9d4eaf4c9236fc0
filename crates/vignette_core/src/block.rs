//! The script block model.
//!
//! A script is an ordered list of [`Block`] values. Blocks arrive from
//! independent generation stages as loosely typed JSON; every field is
//! defaulted at the deserialization boundary so downstream logic never
//! performs presence checks. Unrecognized `type` values deserialize to
//! [`Block::Unknown`], an inert pass-through that keeps its place in the
//! timeline but is ignored by voice and render logic.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Sentinel character name for dialogue blocks that arrive without one.
pub const UNKNOWN_CHARACTER: &str = "Unknown";

fn default_character() -> String {
    UNKNOWN_CHARACTER.to_string()
}

fn default_emotion() -> String {
    "neutral".to_string()
}

/// Voice-shaping attributes attached to a dialogue block.
///
/// All fields are optional; the voice registry turns whatever subset is
/// present into a deterministic voice description. A previously created
/// voice handle may be cached back into `voice_id`.
///
/// # Examples
///
/// ```
/// use vignette_core::VoiceTraits;
///
/// let traits: VoiceTraits = serde_json::from_str(
///     r#"{"age": "young", "gender": "female", "style": "warm"}"#,
/// ).unwrap();
/// assert_eq!(traits.age_range.as_deref(), Some("young"));
/// assert_eq!(traits.voice_style.as_deref(), Some("warm"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceTraits {
    /// Age range descriptor (e.g., "young", "adult", "elderly")
    #[serde(default, alias = "age", skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    /// Gender descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Speaking style descriptor (e.g., "warm", "gravelly")
    #[serde(default, alias = "style", skip_serializing_if = "Option::is_none")]
    pub voice_style: Option<String>,
    /// Accent descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    /// Cached voice handle from a previous synthesis run
    #[serde(
        default,
        alias = "elevenlabs_voice_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub voice_id: Option<String>,
}

impl VoiceTraits {
    /// True when no descriptive trait is present at all.
    pub fn is_empty(&self) -> bool {
        self.age_range.is_none()
            && self.gender.is_none()
            && self.voice_style.is_none()
            && self.accent.is_none()
    }
}

/// Scene-setting block: establishes location and atmosphere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneBlock {
    /// Block identifier, unique within a script
    #[serde(default)]
    pub id: String,
    /// Free-text location description
    #[serde(default)]
    pub setting: String,
    /// Free-text scene description
    #[serde(default)]
    pub description: String,
}

/// A spoken line attributed to a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueBlock {
    /// Block identifier, unique within a script
    #[serde(default)]
    pub id: String,
    /// Character name; matched by string equality across the script
    #[serde(default = "default_character")]
    pub character: String,
    /// The spoken line
    #[serde(default)]
    pub text: String,
    /// Free-text mood label
    #[serde(default = "default_emotion")]
    pub emotion: String,
    /// Voice-shaping attributes
    #[serde(default)]
    pub traits: VoiceTraits,
    /// Path to synthesized line audio, populated by the voice stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl Default for DialogueBlock {
    fn default() -> Self {
        Self {
            id: String::new(),
            character: default_character(),
            text: String::new(),
            emotion: default_emotion(),
            traits: VoiceTraits::default(),
            audio: None,
        }
    }
}

/// Sound and lighting hints attached to an action-family block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    /// Free-text sound hints, scanned for recognized effect keywords
    #[serde(default)]
    pub sound_implications: Vec<String>,
    /// Lighting change hint; presence triggers a visual transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting_change: Option<String>,
}

/// An action, movement, or environment block.
///
/// The three kinds share a shape and differ only in how the compiler
/// projects them; the enclosing [`Block`] variant carries the distinction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionBlock {
    /// Block identifier, unique within a script
    #[serde(default)]
    pub id: String,
    /// Free-text description of what happens
    #[serde(default)]
    pub description: String,
    /// Acting character, when the action has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    /// Sound and lighting hints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_impact: Option<EnvironmentalImpact>,
}

/// One timeline unit, discriminated by its `type` field.
///
/// # Examples
///
/// ```
/// use vignette_core::Block;
///
/// let block: Block = serde_json::from_str(
///     r#"{"type": "dialogue", "id": "1", "character": "Mira", "text": "Hello."}"#,
/// ).unwrap();
/// assert_eq!(block.character(), Some("Mira"));
///
/// // Unrecognized types are preserved, not rejected.
/// let odd: Block = serde_json::from_str(r#"{"type": "hologram", "id": "x"}"#).unwrap();
/// assert!(matches!(odd, Block::Unknown(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Scene-setting block
    Scene(SceneBlock),
    /// Spoken line
    Dialogue(DialogueBlock),
    /// Generic action
    Action(ActionBlock),
    /// Character movement
    Movement(ActionBlock),
    /// Environmental change
    Environment(ActionBlock),
    /// Unrecognized or missing `type`; preserved in order, ignored by
    /// voice and render logic
    Unknown(JsonValue),
}

impl Block {
    /// The block's identifier; empty until the assembler guarantees one.
    pub fn id(&self) -> &str {
        match self {
            Block::Scene(b) => &b.id,
            Block::Dialogue(b) => &b.id,
            Block::Action(b) | Block::Movement(b) | Block::Environment(b) => &b.id,
            Block::Unknown(v) => v.get("id").and_then(JsonValue::as_str).unwrap_or(""),
        }
    }

    /// Assign the block's identifier.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        match self {
            Block::Scene(b) => b.id = id,
            Block::Dialogue(b) => b.id = id,
            Block::Action(b) | Block::Movement(b) | Block::Environment(b) => b.id = id,
            Block::Unknown(v) => {
                if let Some(map) = v.as_object_mut() {
                    map.insert("id".to_string(), JsonValue::String(id));
                }
            }
        }
    }

    /// The character attached to this block, if any.
    pub fn character(&self) -> Option<&str> {
        match self {
            Block::Dialogue(b) => Some(&b.character),
            Block::Action(b) | Block::Movement(b) | Block::Environment(b) => {
                b.character.as_deref()
            }
            _ => None,
        }
    }

    /// The free-text description for non-dialogue blocks, empty otherwise.
    pub fn description(&self) -> &str {
        match self {
            Block::Scene(b) => &b.description,
            Block::Action(b) | Block::Movement(b) | Block::Environment(b) => &b.description,
            _ => "",
        }
    }

    /// The serde tag this block serializes under.
    pub fn type_name(&self) -> &'static str {
        match self {
            Block::Scene(_) => "scene",
            Block::Dialogue(_) => "dialogue",
            Block::Action(_) => "action",
            Block::Movement(_) => "movement",
            Block::Environment(_) => "environment",
            Block::Unknown(_) => "unknown",
        }
    }

    /// True for dialogue blocks.
    pub fn is_dialogue(&self) -> bool {
        matches!(self, Block::Dialogue(_))
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        fn tagged<T: Serialize, S: Serializer>(
            inner: &T,
            tag: &str,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut value = serde_json::to_value(inner).map_err(serde::ser::Error::custom)?;
            if let Some(map) = value.as_object_mut() {
                map.insert("type".to_string(), JsonValue::String(tag.to_string()));
            }
            value.serialize(serializer)
        }

        match self {
            Block::Scene(b) => tagged(b, "scene", serializer),
            Block::Dialogue(b) => tagged(b, "dialogue", serializer),
            Block::Action(b) => tagged(b, "action", serializer),
            Block::Movement(b) => tagged(b, "movement", serializer),
            Block::Environment(b) => tagged(b, "environment", serializer),
            Block::Unknown(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        let kind = value
            .get("type")
            .and_then(JsonValue::as_str)
            .unwrap_or("")
            .to_ascii_lowercase();

        let parsed = match kind.as_str() {
            "scene" => serde_json::from_value(value.clone()).map(Block::Scene),
            "dialogue" => serde_json::from_value(value.clone()).map(Block::Dialogue),
            "action" => serde_json::from_value(value.clone()).map(Block::Action),
            "movement" => serde_json::from_value(value.clone()).map(Block::Movement),
            "environment" => serde_json::from_value(value.clone()).map(Block::Environment),
            _ => return Ok(Block::Unknown(value)),
        };

        parsed.map_err(D::Error::custom)
    }
}
