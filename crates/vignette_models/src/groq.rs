//! Groq LPU inference driver using the OpenAI-compatible client.

use crate::OpenAICompatibleClient;
use async_trait::async_trait;
use tracing::instrument;
use vignette_core::{GenerateRequest, GenerateResponse};
use vignette_error::{ConfigError, VignetteResult};
use vignette_interface::SceneDriver;

/// Default model for script generation stages.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Groq inference API driver.
#[derive(Debug, Clone)]
pub struct GroqDriver {
    inner: OpenAICompatibleClient,
}

impl GroqDriver {
    /// Creates a new Groq driver.
    ///
    /// Reads the API token from the `GROQ_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the API token is not set.
    #[instrument(skip_all, fields(model = %model))]
    pub fn new(model: String) -> VignetteResult<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|e| ConfigError::new(format!("GROQ_API_KEY not set: {}", e)))?;

        Ok(Self::with_api_key(api_key, model))
    }

    /// Creates a new Groq driver with an explicit API key.
    pub fn with_api_key(api_key: String, model: String) -> Self {
        let inner = OpenAICompatibleClient::new(
            api_key,
            model,
            "https://api.groq.com/openai/v1/chat/completions".to_string(),
            "groq",
        );

        Self { inner }
    }
}

#[async_trait]
impl SceneDriver for GroqDriver {
    #[instrument(skip(self, req), fields(provider = "groq", model = %self.inner.model_name()))]
    async fn generate(&self, req: &GenerateRequest) -> VignetteResult<GenerateResponse> {
        self.inner.generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
