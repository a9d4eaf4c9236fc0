//! ElevenLabs client tests against a loopback server.

mod test_utils;

use test_utils::{spawn_server, Route};
use vignette_core::VoiceHandle;
use vignette_error::VignetteErrorKind;
use vignette_interface::VoiceSynthesizer;
use vignette_models::ElevenLabsClient;

fn client(base: &str) -> ElevenLabsClient {
    ElevenLabsClient::with_api_key("test-key".to_string()).with_base_url(base)
}

#[tokio::test]
async fn create_voice_promotes_the_first_preview() {
    let (base, log) = spawn_server(vec![
        Route::ok(
            "/v1/text-to-voice/create-previews",
            r#"{"previews": [{"generated_voice_id": "gen_1"}, {"generated_voice_id": "gen_2"}]}"#,
        ),
        Route::ok(
            "/v1/text-to-voice/create-voice-from-preview",
            r#"{"voice_id": "v_new"}"#,
        ),
    ])
    .await;

    let handle = client(&base)
        .create_voice("A young, female, warm voice.", "Mira")
        .await
        .unwrap();

    assert_eq!(handle.id, "v_new");
    assert_eq!(handle.description, "A young, female, warm voice.");

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.contains("xi-api-key: test-key")));
    // The first preview is the one promoted.
    assert!(requests[1].contains("gen_1"));
    assert!(!requests[1].contains("gen_2"));
}

#[tokio::test]
async fn empty_previews_are_a_voice_error() {
    let (base, _log) = spawn_server(vec![Route::ok(
        "/v1/text-to-voice/create-previews",
        r#"{"previews": []}"#,
    )])
    .await;

    let err = client(&base)
        .create_voice("A voice.", "Mira")
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), VignetteErrorKind::Voice(_)));
    assert!(err.to_string().contains("no previews"));
}

#[tokio::test]
async fn preview_failure_carries_the_status_and_body() {
    let (base, _log) = spawn_server(vec![Route::status(
        "/v1/text-to-voice/create-previews",
        500,
        r#"{"detail": "service exploded"}"#,
    )])
    .await;

    let err = client(&base)
        .create_voice("A voice.", "Mira")
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), VignetteErrorKind::Voice(_)));
    let message = err.to_string();
    assert!(message.contains("preview status 500"));
    assert!(message.contains("service exploded"));
}

#[tokio::test]
async fn synthesize_returns_the_response_bytes() {
    let (base, log) = spawn_server(vec![Route::ok("/v1/text-to-speech/v_1/stream", "mock-mp3-bytes")]).await;

    let handle = VoiceHandle::new("v_1", "A voice.");
    let bytes = client(&base).synthesize("Hello there.", &handle).await.unwrap();

    assert_eq!(bytes, b"mock-mp3-bytes");

    let requests = log.lock().unwrap();
    assert!(requests[0].contains("eleven_multilingual_v2"));
    assert!(requests[0].contains("Hello there."));
}

#[tokio::test]
async fn synthesis_failure_names_the_voice() {
    let (base, _log) = spawn_server(vec![Route::status(
        "/v1/text-to-speech/v_1/stream",
        401,
        r#"{"detail": "bad key"}"#,
    )])
    .await;

    let handle = VoiceHandle::new("v_1", "A voice.");
    let err = client(&base)
        .synthesize("Hello.", &handle)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), VignetteErrorKind::Voice(_)));
    let message = err.to_string();
    assert!(message.contains("v_1"));
    assert!(message.contains("status 401"));
}

#[tokio::test]
async fn list_voices_parses_categories() {
    let (base, _log) = spawn_server(vec![Route::ok(
        "/v1/voices",
        r#"{"voices": [
            {"voice_id": "v_1", "name": "Mira", "category": "generated"},
            {"voice_id": "v_2", "name": "Rachel", "category": "premade"}
        ]}"#,
    )])
    .await;

    let voices = client(&base).list_voices().await.unwrap();

    assert_eq!(voices.len(), 2);
    assert!(voices[0].is_custom());
    assert!(!voices[1].is_custom());
}
