//! Shared client for OpenAI-compatible chat-completions endpoints.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use vignette_core::{GenerateRequest, GenerateResponse, Message, Role};
use vignette_error::{HttpError, JsonError, ScriptError, ScriptErrorKind, VignetteResult};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Chat-completions client for OpenAI-compatible providers.
///
/// Providers like Groq expose the same request/response envelope; this
/// client owns the transport and each provider driver owns naming and
/// error attribution.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    provider: &'static str,
}

impl OpenAICompatibleClient {
    /// Creates a new client for the given endpoint.
    pub fn new(
        api_key: String,
        model: String,
        endpoint: String,
        provider: &'static str,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            endpoint,
            provider,
        }
    }

    /// Provider name this client was created for.
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }

    /// Model identifier requests are sent with.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Send a generation request and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, an
    /// unparsable envelope, or an empty choice list.
    #[instrument(skip(self, req), fields(provider = self.provider, model = %self.model))]
    pub async fn generate(&self, req: &GenerateRequest) -> VignetteResult<GenerateResponse> {
        let messages: Vec<ChatMessage<'_>> = req
            .messages
            .iter()
            .map(|m: &Message| ChatMessage {
                role: role_name(m.role),
                content: &m.content,
            })
            .collect();

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        debug!(url = %self.endpoint, "Sending chat-completions request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScriptError::new(ScriptErrorKind::DriverFailed(format!(
                "{} API error {}: {}",
                self.provider, status, error_text
            )))
            .into());
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("Failed to parse response: {}", e)))?;

        let text = envelope
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                ScriptError::new(ScriptErrorKind::EmptyResponse(self.provider.to_string()))
            })?;

        debug!(response_length = text.len(), "Received chat completion");

        Ok(GenerateResponse::new(text))
    }
}
