//! Integration tests for buffered chat and conversation history

use crate::integration::mock_server::{chat_reply, MockServerFixture};
use ai_lib_gpt::Error;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn chat_returns_reply_and_records_user_turns() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json("/v1/chat/completions", &chat_reply("Hi!")).await;

    let mut client = fixture.client();
    assert_eq!(assert_ok!(client.chat("A").await), "Hi!");
    assert_eq!(assert_ok!(client.chat("B").await), "Hi!");

    assert_eq!(client.historical(), vec!["A", "B"]);
}

#[tokio::test]
async fn chat_sends_history_before_new_turn() {
    let mut fixture = MockServerFixture::new().await;
    let _first = fixture
        .mock_json_matching(
            "/v1/chat/completions",
            json!({ "messages": [{ "role": "user", "content": "A" }] }),
            &chat_reply("first"),
        )
        .await;
    let second = fixture
        .mock_json_matching(
            "/v1/chat/completions",
            json!({
                "model": "gpt-3.5-turbo",
                "stream": false,
                "messages": [
                    { "role": "user", "content": "A" },
                    { "role": "user", "content": "B" }
                ]
            }),
            &chat_reply("second"),
        )
        .await;

    let mut client = fixture.client();
    assert_eq!(client.chat("A").await.unwrap(), "first");
    assert_eq!(client.chat("B").await.unwrap(), "second");
    second.assert_async().await;
}

#[tokio::test]
async fn recorded_replies_are_sent_back() {
    let mut fixture = MockServerFixture::new().await;
    let _first = fixture
        .mock_json_matching(
            "/v1/chat/completions",
            json!({ "messages": [{ "role": "user", "content": "A" }] }),
            &chat_reply("a"),
        )
        .await;
    let second = fixture
        .mock_json_matching(
            "/v1/chat/completions",
            json!({
                "messages": [
                    { "role": "user", "content": "A" },
                    { "role": "assistant", "content": "a" },
                    { "role": "user", "content": "B" }
                ]
            }),
            &chat_reply("b"),
        )
        .await;

    let mut client = fixture.builder().record_replies(true).build().unwrap();
    client.chat("A").await.unwrap();
    client.chat("B").await.unwrap();

    assert_eq!(client.historical(), vec!["A", "a", "B", "b"]);
    second.assert_async().await;
}

#[tokio::test]
async fn empty_choices_is_no_choices_and_history_unchanged() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("/v1/chat/completions", r#"{"choices":[]}"#)
        .await;

    let mut client = fixture.client();
    let err = assert_err!(client.chat("A").await);

    assert!(matches!(err, Error::NoChoices));
    assert!(client.historical().is_empty());
}

#[tokio::test]
async fn missing_content_is_no_content_and_history_unchanged() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "/v1/chat/completions",
            r#"{"choices":[{"message":{"role":"assistant"},"index":0}]}"#,
        )
        .await;

    let mut client = fixture.client();
    let err = client.chat("A").await.unwrap_err();

    assert!(matches!(err, Error::NoContent));
    assert!(client.historical().is_empty());
}

#[tokio::test]
async fn clear_history_forgets_previous_turns() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_json("/v1/chat/completions", &chat_reply("ok")).await;

    let mut client = fixture.client();
    client.chat("A").await.unwrap();
    client.clear_history();
    assert!(client.historical().is_empty());

    client.chat("B").await.unwrap();
    assert_eq!(client.historical(), vec!["B"]);
}
