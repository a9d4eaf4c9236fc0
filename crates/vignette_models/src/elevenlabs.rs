//! ElevenLabs voice creation and text-to-speech client.
//!
//! Voice creation is a two-step exchange: request previews for a voice
//! description, then promote the first preview to a permanent voice. Line
//! synthesis streams MP3 bytes from the text-to-speech endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument};
use vignette_core::VoiceHandle;
use vignette_error::{ConfigError, HttpError, VignetteResult, VoiceError, VoiceErrorKind};
use vignette_interface::{CustomVoice, VoiceSynthesizer};

const BASE_URL: &str = "https://api.elevenlabs.io";

/// Sample text spoken when the service auditions a newly described voice.
const PREVIEW_TEXT: &str = "This is a preview of my voice. I am the character you are \
designing. Listen closely to how I speak. My voice should reflect my personality, \
tone, and emotion clearly.";

#[derive(Debug, Deserialize)]
struct PreviewEntry {
    generated_voice_id: String,
}

#[derive(Debug, Deserialize)]
struct PreviewsResponse {
    #[serde(default)]
    previews: Vec<PreviewEntry>,
}

#[derive(Debug, Deserialize)]
struct CreatedVoice {
    voice_id: String,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<CustomVoice>,
}

/// ElevenLabs API client.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsClient {
    /// Creates a new client.
    ///
    /// Reads the API key from the `ELEVENLABS_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not set.
    #[instrument(skip_all)]
    pub fn new() -> VignetteResult<Self> {
        let api_key = std::env::var("ELEVENLABS_API_KEY")
            .map_err(|e| ConfigError::new(format!("ELEVENLABS_API_KEY not set: {}", e)))?;

        Ok(Self::with_api_key(api_key))
    }

    /// Creates a new client with an explicit API key.
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the base URL (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl VoiceSynthesizer for ElevenLabsClient {
    #[instrument(skip(self), fields(name = %name))]
    async fn create_voice(&self, description: &str, name: &str) -> VignetteResult<VoiceHandle> {
        debug!(description = %description, "Requesting voice previews");

        let response = self
            .client
            .post(self.url("/v1/text-to-voice/create-previews"))
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "voice_description": description,
                "text": PREVIEW_TEXT,
            }))
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Preview request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(VoiceError::new(VoiceErrorKind::CreationFailed {
                description: description.to_string(),
                message: format!("preview status {}: {}", status, message),
            })
            .into());
        }

        let previews: PreviewsResponse = response.json().await.map_err(|e| {
            VoiceError::new(VoiceErrorKind::CreationFailed {
                description: description.to_string(),
                message: format!("unparsable preview response: {}", e),
            })
        })?;

        let generated_voice_id = previews
            .previews
            .into_iter()
            .next()
            .map(|p| p.generated_voice_id)
            .ok_or_else(|| {
                VoiceError::new(VoiceErrorKind::NoPreviews(description.to_string()))
            })?;

        let response = self
            .client
            .post(self.url("/v1/text-to-voice/create-voice-from-preview"))
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "voice_name": name,
                "voice_description": description,
                "generated_voice_id": generated_voice_id,
            }))
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Voice creation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(VoiceError::new(VoiceErrorKind::CreationFailed {
                description: description.to_string(),
                message: format!("creation status {}: {}", status, message),
            })
            .into());
        }

        let created: CreatedVoice = response.json().await.map_err(|e| {
            VoiceError::new(VoiceErrorKind::CreationFailed {
                description: description.to_string(),
                message: format!("unparsable creation response: {}", e),
            })
        })?;

        info!(voice_id = %created.voice_id, "Voice created");

        Ok(VoiceHandle::new(created.voice_id, description))
    }

    #[instrument(skip(self, text), fields(voice_id = %handle.id, text_len = text.len()))]
    async fn synthesize(&self, text: &str, handle: &VoiceHandle) -> VignetteResult<Vec<u8>> {
        let response = self
            .client
            .post(self.url(&format!("/v1/text-to-speech/{}/stream", handle.id)))
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": "eleven_multilingual_v2",
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.75,
                },
            }))
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Synthesis request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(VoiceError::new(VoiceErrorKind::SynthesisFailed {
                voice_id: handle.id.clone(),
                message: format!("status {}: {}", status, message),
            })
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| {
            VoiceError::new(VoiceErrorKind::SynthesisFailed {
                voice_id: handle.id.clone(),
                message: format!("body read failed: {}", e),
            })
        })?;

        debug!(audio_bytes = bytes.len(), "Synthesized line audio");

        Ok(bytes.to_vec())
    }

    #[instrument(skip(self))]
    async fn list_voices(&self) -> VignetteResult<Vec<CustomVoice>> {
        let response = self
            .client
            .get(self.url("/v1/voices"))
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Voice listing failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(VoiceError::new(VoiceErrorKind::ManagementFailed(format!(
                "list status {}",
                status
            )))
            .into());
        }

        let voices: VoicesResponse = response.json().await.map_err(|e| {
            VoiceError::new(VoiceErrorKind::ManagementFailed(format!(
                "unparsable voice list: {}",
                e
            )))
        })?;

        Ok(voices.voices)
    }

    #[instrument(skip(self))]
    async fn delete_voice(&self, voice_id: &str) -> VignetteResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/v1/voices/{}", voice_id)))
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Voice deletion failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(VoiceError::new(VoiceErrorKind::ManagementFailed(format!(
                "delete {} status {}",
                voice_id, status
            )))
            .into());
        }

        info!(voice_id = %voice_id, "Deleted custom voice");
        Ok(())
    }
}
