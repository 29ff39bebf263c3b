//! Integration tests for the completions endpoint

use crate::integration::mock_server::MockServerFixture;
use ai_lib_gpt::Model;
use futures::TryStreamExt;
use serde_json::json;

#[tokio::test]
async fn complete_returns_decoded_envelope() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            "/v1/completions",
            r#"{"choices":[{"text":"Hello there","index":0,"finish_reason":"stop"}],
                "usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#,
        )
        .await;

    let client = fixture.client();
    let response = client.complete("Say hi").await.unwrap();

    assert_eq!(response.text(), Some("Hello there"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(5));
    assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
    mock.assert_async().await;
}

#[tokio::test]
async fn complete_sends_default_model_and_prompt() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "/v1/completions",
            json!({ "model": "text-davinci-003", "prompt": "Say hi", "stream": false }),
            r#"{"choices":[{"text":"hi","index":0}]}"#,
        )
        .await;

    let client = fixture.client();
    client.complete("Say hi").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn configuration_changes_apply_to_next_request() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_matching(
            "/v1/completions",
            json!({ "model": "my-finetune", "temperature": 0.5, "max_tokens": 7 }),
            r#"{"choices":[{"text":"ok","index":0}]}"#,
        )
        .await;

    let mut client = fixture.client();
    client.set_model(Some(Model::custom("my-finetune")));
    client.set_temperature(Some(0.5));
    client.set_max_tokens(Some(7));

    let response = client.complete("go").await.unwrap();
    assert_eq!(response.text(), Some("ok"));
    mock.assert_async().await;
}

#[tokio::test]
async fn complete_stream_yields_text_per_fragment() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse(
            "/v1/completions",
            &[
                r#"data: {"choices":[{"text":"Once","index":0}]}"#,
                "",
                r#"data: {"choices":[{"text":" upon","index":0}]}"#,
                "",
                "data: [DONE]",
            ],
        )
        .await;

    let client = fixture.client();
    let pieces: Vec<String> = client
        .complete_stream("Tell a story")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pieces, vec!["Once", " upon"]);
    assert!(client.historical().is_empty());
}
