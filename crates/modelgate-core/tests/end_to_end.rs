//! End-to-end tests: config file on disk, real HTTP against mock backends

use modelgate_core::{Answer, Client, GateError, ImageOutcome, Message, load_config};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &TempDir, config: serde_json::Value) -> PathBuf {
    let path = dir.path().join("llm_config.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn completion(content: &str) -> serde_json::Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

#[tokio::test]
async fn failing_credential_is_rotated_out() {
    let broken = MockServer::start().await;
    let healthy = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer k1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&broken)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer k2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("OK")))
        .expect(1)
        .mount(&healthy)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        json!({
            "OPENAI_CONFIG": {
                "OPENAI_KEYS_BASES": [
                    {"OPENAI_KEY": "k1", "OPENAI_BASE": broken.uri()},
                    {"OPENAI_KEY": "k2", "OPENAI_BASE": healthy.uri()}
                ],
                "MAX_RETRIES": 2
            }
        }),
    );

    let client = Client::from_source("openai", "gpt-4o", dir.path())
        .unwrap()
        .with_backoff_unit(Duration::from_millis(1));

    let answer = client
        .get_answer(&[Message::system("Be terse."), Message::user("ping")], false)
        .await;
    assert!(matches!(&answer, Answer::Text(text) if text == "OK"), "{answer:?}");
    assert_eq!(client.credential_index(), 1);
}

#[tokio::test]
async fn gemini_stream_from_config_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:streamGenerateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "system: S\n\nuser: U"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Once \"}]}}]}\n\n\
             data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"upon\"}]}}]}\n\n",
            "text/event-stream",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        json!({
            "GEMINI_CONFIG": {
                "API_KEY": "g-key",
                "BASE_URL": mock_server.uri(),
                "MODELS": {"flash": "gemini-2.0-flash"}
            }
        }),
    );

    let config = load_config(&path).unwrap();
    let client = Client::initialize("Gemini", "flash", &config).unwrap();
    let answer = client
        .get_answer(&[Message::system("S"), Message::user("U")], true)
        .await;

    let Answer::Stream(stream) = answer else {
        panic!("expected a stream, got {answer:?}");
    };
    assert_eq!(stream.collect_text().await.unwrap(), "Once upon");
}

#[tokio::test]
async fn rest_model_routes_to_its_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/endpoints/qwen"))
        .and(header("Authorization", "Bearer i-key"))
        .and(body_partial_json(json!({"model": "qwen", "prompt": "user: hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hello"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        json!({
            "INFINGENCE_CONFIG": {
                "API_KEY": "i-key",
                "MODELS": {"qwen": format!("{}/endpoints/qwen", mock_server.uri())}
            }
        }),
    );

    let client = Client::from_source("infingence", "qwen", dir.path()).unwrap();
    let text = client.get_answer(&[Message::user("hi")], false).await.into_text().await;
    assert_eq!(text, "hello");
}

#[tokio::test]
async fn image_generation_end_to_end() {
    let mock_server = MockServer::start().await;
    let asset_url = format!("{}/files/out.png", mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": asset_url}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        json!({
            "DEEPBRICKS_CONFIG": {"API_KEY": "d-key", "BASE_URL": mock_server.uri()}
        }),
    );

    let client = Client::from_source("deepbricks", "dall-e-3", dir.path()).unwrap();
    let outcome = client.generate_image("a red kite", "1024x1024", "standard").await;
    let bytes = outcome.into_result().unwrap();

    let target = dir.path().join("out/kite.png");
    modelgate_core::save_image(&target, &bytes).unwrap();
    assert_eq!(fs::read(&target).unwrap(), b"png-bytes");
}

#[tokio::test]
async fn exhausted_image_retries_are_a_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        json!({
            "DEEPBRICKS_CONFIG": {
                "API_KEY": "d-key",
                "BASE_URL": mock_server.uri(),
                "MAX_RETRIES": 2
            }
        }),
    );

    let client = Client::from_source("deepbricks", "dall-e-3", dir.path())
        .unwrap()
        .with_backoff_unit(Duration::from_millis(1));

    match client.generate_image("a red kite", "1024x1024", "standard").await {
        ImageOutcome::Failed(failure) => {
            assert_eq!(failure.attempts, 2);
            assert_eq!(failure.last_error.status(), Some(503));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = Client::from_source("openai", "gpt-4o", dir.path()).unwrap_err();
    assert!(matches!(err, GateError::ConfigMissing { .. }), "{err:?}");
}

#[test]
fn env_overlay_supplies_missing_credentials() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, json!({"GEMINI_CONFIG": {"MODELS": {"flash": "gemini-2.0-flash"}}}));

    let config = load_config(&path)
        .unwrap()
        .with_overrides_from([("MODELGATE_GEMINI_API_KEY", "from-env")]);
    let client = Client::initialize("gemini", "flash", &config).unwrap();
    assert_eq!(client.credential_count(), 1);
}
