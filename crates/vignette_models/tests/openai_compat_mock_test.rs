//! Chat-completions client tests against a loopback server.

mod test_utils;

use test_utils::{spawn_server, Route};
use vignette_core::{GenerateRequest, Message, Role};
use vignette_error::VignetteErrorKind;
use vignette_models::OpenAICompatibleClient;

fn client(base: &str) -> OpenAICompatibleClient {
    OpenAICompatibleClient::new(
        "test-key".to_string(),
        "test-model".to_string(),
        format!("{}/v1/chat/completions", base),
        "groq",
    )
}

fn request() -> GenerateRequest {
    GenerateRequest {
        messages: vec![
            Message::new(Role::System, "You write scene scripts."),
            Message::new(Role::User, "A quiet evening."),
        ],
        max_tokens: Some(200),
        temperature: Some(0.7),
    }
}

#[tokio::test]
async fn generate_returns_the_first_choice() {
    let (base, log) = spawn_server(vec![Route::ok(
        "/v1/chat/completions",
        r#"{"choices": [
            {"message": {"content": "INT. WAREHOUSE - NIGHT"}},
            {"message": {"content": "second choice"}}
        ]}"#,
    )])
    .await;

    let response = client(&base).generate(&request()).await.unwrap();

    assert_eq!(response.text, "INT. WAREHOUSE - NIGHT");

    let requests = log.lock().unwrap();
    assert!(requests[0].contains("authorization: Bearer test-key"));
    assert!(requests[0].contains("test-model"));
    assert!(requests[0].contains("You write scene scripts."));
    assert!(requests[0].contains("A quiet evening."));
}

#[tokio::test]
async fn non_success_status_names_the_provider() {
    let (base, _log) = spawn_server(vec![Route::status(
        "/v1/chat/completions",
        429,
        r#"{"error": "rate limited"}"#,
    )])
    .await;

    let err = client(&base).generate(&request()).await.unwrap_err();

    assert!(matches!(err.kind(), VignetteErrorKind::Script(_)));
    let message = err.to_string();
    assert!(message.contains("groq API error 429"));
    assert!(message.contains("rate limited"));
}

#[tokio::test]
async fn empty_choices_are_an_error() {
    let (base, _log) = spawn_server(vec![Route::ok(
        "/v1/chat/completions",
        r#"{"choices": []}"#,
    )])
    .await;

    let err = client(&base).generate(&request()).await.unwrap_err();

    assert!(matches!(err.kind(), VignetteErrorKind::Script(_)));
    assert!(err.to_string().contains("empty response"));
}

#[tokio::test]
async fn garbled_envelope_is_a_json_error() {
    let (base, _log) = spawn_server(vec![Route::ok(
        "/v1/chat/completions",
        "not json at all",
    )])
    .await;

    let err = client(&base).generate(&request()).await.unwrap_err();

    assert!(matches!(err.kind(), VignetteErrorKind::Json(_)));
}
