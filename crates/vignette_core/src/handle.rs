//! Opaque voice handle.

use serde::{Deserialize, Serialize};

/// Reference to a synthesized voice, paired with the description that
/// produced it. The description doubles as the creation cache key, so it
/// must be byte-identical for identical inputs.
///
/// # Examples
///
/// ```
/// use vignette_core::VoiceHandle;
///
/// let handle = VoiceHandle::new("v_abc123", "A young, female, warm voice.");
/// assert_eq!(handle.id, "v_abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct VoiceHandle {
    /// Opaque service-side identifier
    #[new(into)]
    pub id: String,
    /// The voice description this handle was created from
    #[new(into)]
    pub description: String,
}
