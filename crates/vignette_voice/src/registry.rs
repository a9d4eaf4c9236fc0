//! Character-to-voice resolution with creation caching.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use vignette_core::{VoiceHandle, VoiceTraits};
use vignette_error::VignetteResult;
use vignette_interface::VoiceSynthesizer;

use crate::description::{build_voice_description, DEFAULT_DESCRIPTION};

// Stock service voices used when creation is unavailable or fails.
const DEFAULT_MALE_VOICE: &str = "pNInz6obpgDQGcFmaJgB";
const DEFAULT_FEMALE_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
const DEFAULT_NEUTRAL_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";

fn default_handle(traits: &VoiceTraits) -> VoiceHandle {
    let gender = traits.gender.as_deref().unwrap_or("").to_ascii_lowercase();
    let id = match gender.as_str() {
        "male" => DEFAULT_MALE_VOICE,
        "female" => DEFAULT_FEMALE_VOICE,
        _ => DEFAULT_NEUTRAL_VOICE,
    };
    VoiceHandle::new(id, DEFAULT_DESCRIPTION)
}

/// Process-wide voice caches shared across pipeline runs.
///
/// Creation is cached by the exact voice description, so a character
/// described identically in two runs reuses the first run's voice.
/// Creation for a given description is serialized so concurrent runs never
/// create the same voice twice.
///
/// Resolution happens through a [`VoiceSession`]: each run layers its own
/// character map over these caches, so a voice assigned within a run never
/// changes mid-run even if another run invalidates it.
pub struct VoiceRegistry {
    synthesizer: Option<Arc<dyn VoiceSynthesizer>>,
    /// Character name -> handle, populated by successful resolutions.
    characters: Mutex<HashMap<String, VoiceHandle>>,
    /// Voice description -> handle, populated by successful creation.
    descriptions: Mutex<HashMap<String, VoiceHandle>>,
    /// One lock per in-flight description, double-checked after acquisition.
    creation_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl VoiceRegistry {
    /// Creates a registry around an optional synthesizer.
    pub fn new(synthesizer: Option<Arc<dyn VoiceSynthesizer>>) -> Self {
        if synthesizer.is_none() {
            warn!("No voice synthesizer configured; stock voices will be used");
        }

        Self {
            synthesizer,
            characters: Mutex::new(HashMap::new()),
            descriptions: Mutex::new(HashMap::new()),
            creation_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Open a resolution session for one pipeline run.
    pub fn session(self: &Arc<Self>) -> VoiceSession {
        VoiceSession {
            registry: Arc::clone(self),
            voices: Mutex::new(HashMap::new()),
        }
    }

    async fn lookup(&self, character: &str) -> Option<VoiceHandle> {
        self.characters.lock().await.get(character).cloned()
    }

    async fn remember(&self, character: &str, handle: &VoiceHandle) {
        self.characters
            .lock()
            .await
            .insert(character.to_string(), handle.clone());
    }

    async fn create(&self, character: &str, description: &str) -> VignetteResult<VoiceHandle> {
        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or_else(|| {
                vignette_error::VoiceError::new(vignette_error::VoiceErrorKind::NotConfigured)
            })?
            .clone();

        if let Some(handle) = self.descriptions.lock().await.get(description) {
            return Ok(handle.clone());
        }

        let lock = {
            let mut locks = self.creation_locks.lock().await;
            locks
                .entry(description.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = lock.lock().await;

        // Another run may have created this voice while we waited.
        if let Some(handle) = self.descriptions.lock().await.get(description) {
            return Ok(handle.clone());
        }

        let handle = synthesizer.create_voice(description, character).await?;
        info!(voice_id = %handle.id, character = %character, "Voice registered");

        self.descriptions
            .lock()
            .await
            .insert(description.to_string(), handle.clone());

        Ok(handle)
    }

    /// Drop the cached handle for one character.
    ///
    /// Also drops the description cache entry backing it, so the next
    /// resolution creates a fresh voice. Sessions already holding the
    /// handle keep it for the rest of their run.
    pub async fn invalidate(&self, character: &str) {
        let removed = self.characters.lock().await.remove(character);
        if let Some(handle) = removed {
            self.descriptions.lock().await.remove(&handle.description);
        }
    }

    /// Clear all cached handles.
    ///
    /// With `delete_remote` set, custom voices on the service are deleted
    /// as well; premade voices are never touched. Individual deletion
    /// failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote voice listing cannot be fetched.
    #[instrument(skip(self))]
    pub async fn clear(&self, delete_remote: bool) -> VignetteResult<()> {
        self.characters.lock().await.clear();
        self.descriptions.lock().await.clear();

        if !delete_remote {
            return Ok(());
        }

        let Some(synthesizer) = &self.synthesizer else {
            return Ok(());
        };

        for voice in synthesizer.list_voices().await? {
            if !voice.is_custom() {
                continue;
            }
            match synthesizer.delete_voice(&voice.voice_id).await {
                Ok(()) => info!(voice_id = %voice.voice_id, name = %voice.name, "Deleted custom voice"),
                Err(e) => warn!(voice_id = %voice.voice_id, error = %e, "Failed to delete custom voice"),
            }
        }

        Ok(())
    }
}

/// One run's view of the registry.
///
/// Resolution order: this session's map, then a handle embedded in the
/// block's traits, then the registry's character cache, then voice
/// creation. The session map always wins, so a character keeps one voice
/// for the whole run regardless of what other runs do to the shared
/// caches.
pub struct VoiceSession {
    registry: Arc<VoiceRegistry>,
    /// Character name -> handle, this run only.
    voices: Mutex<HashMap<String, VoiceHandle>>,
}

impl VoiceSession {
    /// Resolve a character to a voice handle.
    ///
    /// Resolution never fails: when the synthesizer is absent or creation
    /// fails, a fixed stock voice chosen by the gender trait stands in.
    /// The fallback is cached in this session only, so the failure is not
    /// retried line by line but a later run does retry creation.
    #[instrument(skip(self, traits), fields(character = %character))]
    pub async fn resolve(
        &self,
        character: &str,
        traits: &VoiceTraits,
        emotion: &str,
    ) -> VoiceHandle {
        if let Some(handle) = self.voices.lock().await.get(character) {
            return handle.clone();
        }

        let description = build_voice_description(traits, emotion);

        if let Some(id) = &traits.voice_id {
            let handle = VoiceHandle::new(id.clone(), description);
            self.remember(character, &handle).await;
            self.registry.remember(character, &handle).await;
            return handle;
        }

        if let Some(handle) = self.registry.lookup(character).await {
            self.remember(character, &handle).await;
            return handle;
        }

        match self.registry.create(character, &description).await {
            Ok(handle) => {
                self.remember(character, &handle).await;
                self.registry.remember(character, &handle).await;
                handle
            }
            Err(e) => {
                warn!(
                    error = %e,
                    character = %character,
                    "Voice creation unavailable, using stock voice"
                );
                let handle = default_handle(traits);
                self.remember(character, &handle).await;
                handle
            }
        }
    }

    /// Drop the character's voice from this session and the shared caches.
    pub async fn invalidate(&self, character: &str) {
        self.voices.lock().await.remove(character);
        self.registry.invalidate(character).await;
    }

    async fn remember(&self, character: &str, handle: &VoiceHandle) {
        self.voices
            .lock()
            .await
            .insert(character.to_string(), handle.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vignette_error::{VoiceError, VoiceErrorKind};
    use vignette_interface::CustomVoice;

    struct CountingSynthesizer {
        creations: AtomicUsize,
        fail: bool,
    }

    impl CountingSynthesizer {
        fn new(fail: bool) -> Self {
            Self {
                creations: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl VoiceSynthesizer for CountingSynthesizer {
        async fn create_voice(&self, description: &str, _name: &str) -> VignetteResult<VoiceHandle> {
            let n = self.creations.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(VoiceError::new(VoiceErrorKind::NoPreviews(
                    description.to_string(),
                ))
                .into());
            }
            Ok(VoiceHandle::new(format!("v_{}", n), description))
        }

        async fn synthesize(&self, _text: &str, _handle: &VoiceHandle) -> VignetteResult<Vec<u8>> {
            Ok(vec![0u8; 16])
        }

        async fn list_voices(&self) -> VignetteResult<Vec<CustomVoice>> {
            Ok(Vec::new())
        }

        async fn delete_voice(&self, _voice_id: &str) -> VignetteResult<()> {
            Ok(())
        }
    }

    fn female_traits() -> VoiceTraits {
        VoiceTraits {
            gender: Some("female".to_string()),
            voice_style: Some("warm".to_string()),
            ..VoiceTraits::default()
        }
    }

    #[tokio::test]
    async fn identical_resolves_create_once() {
        let synth = Arc::new(CountingSynthesizer::new(false));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));
        let session = registry.session();

        let first = session.resolve("Mira", &female_traits(), "calm").await;
        let second = session.resolve("Mira", &female_traits(), "calm").await;
        let third = session.resolve("Mira", &female_traits(), "calm").await;

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(synth.creations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn identical_descriptions_share_a_voice_across_characters() {
        let synth = Arc::new(CountingSynthesizer::new(false));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));
        let session = registry.session();

        let a = session.resolve("Guard A", &female_traits(), "calm").await;
        let b = session.resolve("Guard B", &female_traits(), "calm").await;

        assert_eq!(a.id, b.id);
        assert_eq!(synth.creations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn traits_handle_short_circuits_creation() {
        let synth = Arc::new(CountingSynthesizer::new(false));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));
        let session = registry.session();

        let traits = VoiceTraits {
            voice_id: Some("v_existing".to_string()),
            ..female_traits()
        };
        let handle = session.resolve("Mira", &traits, "calm").await;

        assert_eq!(handle.id, "v_existing");
        assert_eq!(synth.creations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn traits_handle_overrides_shared_character_cache() {
        let synth = Arc::new(CountingSynthesizer::new(false));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));

        // A previous run caches a created voice for the character.
        let earlier = registry.session();
        let created = earlier.resolve("Mira", &female_traits(), "calm").await;
        assert_eq!(created.id, "v_0");

        // A later run whose block carries an explicit handle must get
        // that handle, not the cached one.
        let later = registry.session();
        let traits = VoiceTraits {
            voice_id: Some("v_explicit".to_string()),
            ..female_traits()
        };
        let handle = later.resolve("Mira", &traits, "calm").await;

        assert_eq!(handle.id, "v_explicit");
        assert_eq!(synth.creations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn session_keeps_its_voice_across_invalidation() {
        let synth = Arc::new(CountingSynthesizer::new(false));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));
        let session = registry.session();

        let first = session.resolve("Mira", &female_traits(), "calm").await;

        // Another run invalidates the shared caches mid-scene.
        registry.invalidate("Mira").await;

        let second = session.resolve("Mira", &female_traits(), "calm").await;
        assert_eq!(first, second);
        assert_eq!(synth.creations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn creation_failure_falls_back_to_stock_voice_once_per_session() {
        let synth = Arc::new(CountingSynthesizer::new(true));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));
        let session = registry.session();

        let first = session.resolve("Mira", &female_traits(), "calm").await;
        let second = session.resolve("Mira", &female_traits(), "calm").await;

        assert_eq!(first.id, DEFAULT_FEMALE_VOICE);
        assert_eq!(first, second);
        // The stock fallback is cached for the run, so the failure is not
        // retried line by line.
        assert_eq!(synth.creations.load(Ordering::SeqCst), 1);

        // A fresh run retries creation instead of inheriting the fallback.
        let retry = registry.session();
        retry.resolve("Mira", &female_traits(), "calm").await;
        assert_eq!(synth.creations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn no_synthesizer_yields_gendered_defaults() {
        let registry = Arc::new(VoiceRegistry::new(None));
        let session = registry.session();

        let male = VoiceTraits {
            gender: Some("male".to_string()),
            ..VoiceTraits::default()
        };
        assert_eq!(
            session.resolve("Joss", &male, "").await.id,
            DEFAULT_MALE_VOICE
        );
        assert_eq!(
            session.resolve("Narrator", &VoiceTraits::default(), "").await.id,
            DEFAULT_NEUTRAL_VOICE
        );
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_creation() {
        let synth = Arc::new(CountingSynthesizer::new(false));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));
        let session = registry.session();

        session.resolve("Mira", &female_traits(), "calm").await;
        session.invalidate("Mira").await;
        session.resolve("Mira", &female_traits(), "calm").await;

        assert_eq!(synth.creations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_sessions_create_once() {
        let synth = Arc::new(CountingSynthesizer::new(false));
        let registry = Arc::new(VoiceRegistry::new(Some(synth.clone())));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    let session = registry.session();
                    session.resolve("Mira", &female_traits(), "calm").await
                })
            })
            .collect();

        let mut handles = Vec::new();
        for task in tasks {
            handles.push(task.await.unwrap());
        }

        assert!(handles.windows(2).all(|w| w[0].id == w[1].id));
        assert_eq!(synth.creations.load(Ordering::SeqCst), 1);
    }
}
