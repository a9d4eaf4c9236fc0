//! Request and response types for LLM generation.

use serde::{Deserialize, Serialize};

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// End-user content
    User,
    /// Model output
    Assistant,
}

/// One conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_new::new)]
pub struct Message {
    /// Author role
    pub role: Role,
    /// Message text
    #[new(into)]
    pub content: String,
}

/// Generation request sent to a scene driver.
///
/// # Examples
///
/// ```
/// use vignette_core::{GenerateRequest, Message, Role};
///
/// let request = GenerateRequest {
///     messages: vec![
///         Message::new(Role::System, "You write scene plans."),
///         Message::new(Role::User, "Prompt: a rainy rooftop chase"),
///     ],
///     max_tokens: Some(1000),
///     temperature: Some(0.7),
/// };
/// assert_eq!(request.messages.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0)
    pub temperature: Option<f32>,
}

/// The unified driver response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_new::new)]
pub struct GenerateResponse {
    /// The generated text
    #[new(into)]
    pub text: String,
}
