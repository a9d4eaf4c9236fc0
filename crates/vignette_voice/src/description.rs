//! Deterministic voice descriptions.

use vignette_core::VoiceTraits;

/// The description used when a block carries no voice-shaping information.
pub(crate) const DEFAULT_DESCRIPTION: &str = "A adult, neutral, clear voice.";

/// Build the voice description for a set of traits and an emotion.
///
/// The description doubles as the voice creation cache key, so identical
/// inputs must produce byte-identical output: present fields join in a
/// fixed order (age range, gender, style, accent), followed by an emotion
/// tone unless the emotion is empty or `"neutral"`.
///
/// # Examples
///
/// ```
/// use vignette_core::VoiceTraits;
/// use vignette_voice::build_voice_description;
///
/// let traits = VoiceTraits {
///     age_range: Some("young".into()),
///     gender: Some("female".into()),
///     voice_style: Some("warm".into()),
///     accent: Some("British".into()),
///     voice_id: None,
/// };
/// assert_eq!(
///     build_voice_description(&traits, "excited"),
///     "A young, female, warm, British accent, excited tone voice.",
/// );
/// assert_eq!(
///     build_voice_description(&VoiceTraits::default(), "neutral"),
///     "A adult, neutral, clear voice.",
/// );
/// ```
pub fn build_voice_description(traits: &VoiceTraits, emotion: &str) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(5);

    if let Some(age) = &traits.age_range {
        parts.push(age.clone());
    }
    if let Some(gender) = &traits.gender {
        parts.push(gender.clone());
    }
    if let Some(style) = &traits.voice_style {
        parts.push(style.clone());
    }
    if let Some(accent) = &traits.accent {
        parts.push(format!("{} accent", accent));
    }
    if !emotion.is_empty() && emotion != "neutral" {
        parts.push(format!("{} tone", emotion));
    }

    if parts.is_empty() {
        return DEFAULT_DESCRIPTION.to_string();
    }

    format!("A {} voice.", parts.join(", "))
}
