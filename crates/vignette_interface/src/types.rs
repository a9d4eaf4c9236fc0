//! Shared types for collaborator traits.

use serde::{Deserialize, Serialize};

/// A custom voice registered on the remote synthesis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVoice {
    /// Service-side voice identifier
    pub voice_id: String,
    /// Display name the voice was created under
    pub name: String,
    /// Service category; premade voices are never deleted
    pub category: String,
}

impl CustomVoice {
    /// True when this voice was created by a pipeline run rather than
    /// shipped by the service.
    pub fn is_custom(&self) -> bool {
        self.category != "premade"
    }
}
