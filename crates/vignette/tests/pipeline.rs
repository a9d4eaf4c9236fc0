//! End-to-end pipeline tests with mock collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vignette::{Pipeline, SceneDriver, VoiceSynthesizer};
use vignette_core::{GenerateRequest, GenerateResponse, VoiceHandle};
use vignette_error::{HttpError, VignetteResult};
use vignette_interface::CustomVoice;

/// Driver that serves a fixed response per stage, in call order.
struct StagedDriver {
    responses: Vec<String>,
    calls: Mutex<usize>,
}

impl StagedDriver {
    fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: responses.into_iter().map(str::to_string).collect(),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl SceneDriver for StagedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> VignetteResult<GenerateResponse> {
        let mut calls = self.calls.lock().unwrap();
        let response = self.responses[*calls % self.responses.len()].clone();
        *calls += 1;
        Ok(GenerateResponse::new(response))
    }

    fn provider_name(&self) -> &'static str {
        "staged"
    }

    fn model_name(&self) -> &str {
        "staged-test"
    }
}

struct MockSynthesizer {
    fail: bool,
}

#[async_trait]
impl VoiceSynthesizer for MockSynthesizer {
    async fn create_voice(&self, description: &str, _name: &str) -> VignetteResult<VoiceHandle> {
        if self.fail {
            return Err(HttpError::new("voice service down").into());
        }
        Ok(VoiceHandle::new("mock_voice", description))
    }

    async fn synthesize(&self, _text: &str, _handle: &VoiceHandle) -> VignetteResult<Vec<u8>> {
        if self.fail {
            return Err(HttpError::new("voice service down").into());
        }
        Ok(b"ID3 mock audio bytes".to_vec())
    }

    async fn list_voices(&self) -> VignetteResult<Vec<CustomVoice>> {
        Ok(Vec::new())
    }

    async fn delete_voice(&self, _voice_id: &str) -> VignetteResult<()> {
        Ok(())
    }
}

const PLAN_JSON: &str = r#"{
    "setting": "An abandoned warehouse",
    "characters": ["Mira", "Joss"],
    "conflict": "a missing shipment",
    "tone": "tense",
    "events": ["Confrontation", "Revelation"]
}"#;

const DIALOGUE_JSON: &str = r#"[
    {"type": "dialogue", "id": "d1", "character": "Mira", "text": "Where is the shipment?", "emotion": "angry"},
    {"type": "dialogue", "id": "d2", "character": "Joss", "text": "I have no idea.", "emotion": "nervous"}
]"#;

const ACTIONS_JSON: &str = r#"[
    {"type": "environment", "id": "a1", "description": "Rain drums on the roof",
     "environmental_impact": {"sound_implications": ["heavy rain"]}}
]"#;

fn staged_pipeline(output_dir: &std::path::Path, synthesizer_fails: bool) -> Pipeline {
    let driver = Arc::new(StagedDriver::new(vec![PLAN_JSON, DIALOGUE_JSON, ACTIONS_JSON]));
    let synthesizer = Arc::new(MockSynthesizer {
        fail: synthesizer_fails,
    });

    Pipeline::new(
        Some(driver),
        Some(synthesizer),
        output_dir.to_path_buf(),
        None,
    )
}

#[tokio::test]
async fn full_run_writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = staged_pipeline(dir.path(), false);

    let output = pipeline
        .run("Two smugglers argue in a warehouse", &[])
        .await
        .unwrap();

    assert_eq!(output.plan.setting, "An abandoned warehouse");
    assert_eq!(output.timeline[0].id(), "scene_start");
    assert_eq!(output.metadata.dialogue_count, 2);
    assert_eq!(output.metadata.character_count, 2);
    assert_eq!(output.metadata.audio_file_count, 2);

    let root = &output.project.root;
    assert!(root.join("scripts/scene_plan.json").exists());
    assert!(root.join("scripts/script.json").exists());
    assert!(root.join("scripts/script_analysis.json").exists());
    assert!(root.join("audio/Mira_d1.mp3").exists());
    assert!(root.join("audio/Joss_d2.mp3").exists());
    assert!(root.join("project_metadata.json").exists());

    let scene = output.scene.as_ref().unwrap();
    assert!(scene.script_file.exists());
    assert!(scene.preview_file.exists());
    assert!(root.join("scenes/options.rpy").exists());
    assert!(root.join("scenes/gui.rpy").exists());

    let script = std::fs::read_to_string(&scene.script_file).unwrap();
    assert!(script.contains("scene bg warehouse"));
    assert!(script.contains("voice \"audio/Mira_d1.mp3\""));
    assert!(script.contains("play sound audio.rain loop"));

    // Synthesized audio is real bytes, not a placeholder.
    let audio = std::fs::read(root.join("audio/Mira_d1.mp3")).unwrap();
    assert_eq!(audio, b"ID3 mock audio bytes");
    assert!(!root.join("audio/Mira_d1.txt").exists());
}

#[tokio::test]
async fn run_without_collaborators_degrades_to_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(None, None, dir.path().to_path_buf(), None);

    let output = pipeline.run("A quiet evening", &[]).await.unwrap();

    // Static fallback script, narrated.
    assert!(output.timeline.iter().any(|b| b.character() == Some("Narrator")));
    assert!(output.audio_map.is_empty());
    assert_eq!(output.metadata.audio_file_count, 0);

    // Placeholder audio with sidecars for every dialogue line.
    assert!(!output.manifest.audio_placeholders.is_empty());
    let root = &output.project.root;
    for placeholder in &output.manifest.audio_placeholders {
        assert!(root.join(placeholder).exists());
        assert!(root.join(placeholder.replace(".mp3", ".txt")).exists());
    }

    // Every dialogue block references its placeholder, and the persisted
    // script carries the same paths.
    let script_json = std::fs::read_to_string(root.join("scripts/script.json")).unwrap();
    for block in &output.timeline {
        let vignette_core::Block::Dialogue(line) = block else {
            continue;
        };
        let audio = line.audio.as_deref().unwrap();
        assert!(root.join(audio).exists());
        assert!(script_json.contains(audio));
    }

    // The scene still compiles.
    let scene = output.scene.as_ref().unwrap();
    let script = std::fs::read_to_string(&scene.script_file).unwrap();
    assert!(script.contains("label start:"));
    assert!(script.contains("return"));
    // Placeholder audio never gets a voice cue.
    assert!(!script.contains("voice \""));
}

#[tokio::test]
async fn garbled_driver_output_still_produces_a_scene() {
    let dir = tempfile::tempdir().unwrap();
    let driver = Arc::new(StagedDriver::new(vec![
        "I cannot answer that in JSON, sorry.",
    ]));
    let pipeline = Pipeline::new(Some(driver), None, dir.path().to_path_buf(), None);

    let output = pipeline.run("A rooftop chase", &[]).await.unwrap();

    // Prose interpretation becomes the conflict; the rest falls back.
    assert_eq!(output.plan.setting, "Unknown location");
    assert!(output.timeline.iter().any(|b| b.is_dialogue()));
    assert!(output.scene.is_some());
}

#[tokio::test]
async fn failing_synthesizer_falls_back_to_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = staged_pipeline(dir.path(), true);

    let output = pipeline.run("An argument", &[]).await.unwrap();

    assert!(output.audio_map.is_empty());
    assert_eq!(output.metadata.audio_file_count, 0);

    let root = &output.project.root;
    assert!(root.join("audio/Mira_d1.txt").exists());
    assert!(root.join("audio/Joss_d2.mp3").exists());
    assert!(output.scene.is_some());

    // The failed lines still point at valid placeholder audio.
    for block in &output.timeline {
        let vignette_core::Block::Dialogue(line) = block else {
            continue;
        };
        assert!(root.join(line.audio.as_deref().unwrap()).exists());
    }
}

#[tokio::test]
async fn listing_returns_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(None, None, dir.path().to_path_buf(), None);

    pipeline.run("first prompt", &[]).await.unwrap();
    pipeline.run("second prompt", &[]).await.unwrap();

    let projects = pipeline.list().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].prompt, "second prompt");
    assert_eq!(projects[1].prompt, "first prompt");
}
