//! Collision-free character identifiers.

use std::collections::HashMap;

use vignette_core::sanitize_identifier;

/// Assigns each character name a unique script identifier.
///
/// Sanitization can collapse distinct names ("Mr. Chen" and "Mr Chen")
/// onto the same identifier; the later name gets a positional suffix so
/// script references stay unambiguous. The same name always resolves to
/// the same identifier within one scene.
///
/// # Examples
///
/// ```
/// use vignette_scene::CharacterIdentifiers;
///
/// let mut idents = CharacterIdentifiers::new();
/// assert_eq!(idents.resolve("Detective Chen"), "detective_chen");
/// assert_eq!(idents.resolve("Detective Chen"), "detective_chen");
/// assert_eq!(idents.resolve("Detective-Chen"), "detective_chen_2");
/// ```
#[derive(Debug, Default)]
pub struct CharacterIdentifiers {
    by_name: HashMap<String, String>,
    used: HashMap<String, usize>,
}

impl CharacterIdentifiers {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The identifier for a character name, assigning one on first use.
    pub fn resolve(&mut self, name: &str) -> String {
        if let Some(existing) = self.by_name.get(name) {
            return existing.clone();
        }

        let base = sanitize_identifier(name);
        let count = self.used.entry(base.clone()).or_insert(0);
        *count += 1;

        let identifier = if *count == 1 {
            base
        } else {
            format!("{}_{}", base, count)
        };

        self.by_name.insert(name.to_string(), identifier.clone());
        identifier
    }

    /// The identifier previously assigned to a name, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_resolves_identically() {
        let mut idents = CharacterIdentifiers::new();
        let first = idents.resolve("Mira Vale");
        let second = idents.resolve("Mira Vale");
        assert_eq!(first, second);
        assert_eq!(first, "mira_vale");
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let mut idents = CharacterIdentifiers::new();
        assert_eq!(idents.resolve("Mr. Chen"), "mr_chen");
        assert_eq!(idents.resolve("Mr Chen"), "mr_chen_2");
        assert_eq!(idents.resolve("MR CHEN!"), "mr_chen_3");
        // And each stays stable afterwards.
        assert_eq!(idents.resolve("Mr Chen"), "mr_chen_2");
    }

    #[test]
    fn digit_and_empty_names_are_usable() {
        let mut idents = CharacterIdentifiers::new();
        assert_eq!(idents.resolve("2Bad Name!!"), "_2bad_name");
        assert_eq!(idents.resolve(""), "unknown");
        assert_eq!(idents.resolve("???"), "unknown_2");
    }
}
