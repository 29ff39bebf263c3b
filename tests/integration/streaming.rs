//! Integration tests for streaming responses

use crate::integration::mock_server::{delta_line, MockServerFixture};
use ai_lib_gpt::Error;
use futures::{StreamExt, TryStreamExt};

#[tokio::test]
async fn chat_stream_yields_deltas_and_records_user_turn_once() {
    let mut fixture = MockServerFixture::new().await;
    let role_only = r#"data: {"choices":[{"delta":{"role":"assistant"},"index":0}]}"#;
    let hello = delta_line("Hello");
    let world = delta_line(" World");
    let _mock = fixture
        .mock_sse(
            "/v1/chat/completions",
            &[role_only, "", &hello, "", &world, "", "data: [DONE]", ""],
        )
        .await;

    let mut client = fixture.client();
    let pieces: Vec<String> = client
        .chat_stream("hi")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pieces, vec!["Hello", " World"]);
    assert_eq!(client.historical(), vec!["hi"]);
}

#[tokio::test]
async fn nothing_after_done_is_delivered() {
    let mut fixture = MockServerFixture::new().await;
    let hello = delta_line("Hello");
    let late = delta_line("late");
    let _mock = fixture
        .mock_sse(
            "/v1/chat/completions",
            &[&hello, "data: [DONE]", &late, &late],
        )
        .await;

    let mut client = fixture.client();
    let pieces: Vec<String> = client
        .chat_stream("hi")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pieces, vec!["Hello"]);
    assert_eq!(client.historical().len(), 1);
}

#[tokio::test]
async fn stream_without_content_records_nothing() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_sse("/v1/chat/completions", &["", "data: [DONE]"])
        .await;

    let mut client = fixture.client();
    let pieces: Vec<String> = client
        .chat_stream("hi")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert!(pieces.is_empty());
    assert!(client.historical().is_empty());
}

#[tokio::test]
async fn streamed_reply_recorded_when_enabled() {
    let mut fixture = MockServerFixture::new().await;
    let hel = delta_line("Hel");
    let lo = delta_line("lo");
    let _mock = fixture
        .mock_sse("/v1/chat/completions", &[&hel, &lo, "data: [DONE]"])
        .await;

    let mut client = fixture.builder().record_replies(true).build().unwrap();
    let pieces: Vec<String> = client
        .chat_stream("hi")
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pieces.concat(), "Hello");
    assert_eq!(client.historical(), vec!["hi", "Hello"]);
}

#[tokio::test]
async fn failed_stream_request_drains_error_body() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error("/v1/chat/completions", 503, "overloaded, try later")
        .await;

    let mut client = fixture.client();
    let err = client.chat_stream("hi").await.err().unwrap();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded, try later");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
    assert!(client.historical().is_empty());
}

#[tokio::test]
async fn malformed_fragment_ends_stream_with_one_error() {
    let mut fixture = MockServerFixture::new().await;
    let hello = delta_line("Hello");
    let after = delta_line("after");
    let _mock = fixture
        .mock_sse(
            "/v1/chat/completions",
            &[&hello, "data: {not json", &after, "data: [DONE]"],
        )
        .await;

    let mut client = fixture.client();
    let items: Vec<_> = client.chat_stream("hi").await.unwrap().collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "Hello");
    assert!(matches!(items[1], Err(Error::Decode(_))));
    assert_eq!(client.historical(), vec!["hi"]);
}

#[tokio::test]
async fn cancelled_stream_yields_nothing_more() {
    let mut fixture = MockServerFixture::new().await;
    let hello = delta_line("Hello");
    let _mock = fixture
        .mock_sse("/v1/chat/completions", &[&hello, "data: [DONE]"])
        .await;

    let mut client = fixture.client();
    let (mut stream, handle) = client.chat_stream_with_cancel("hi").await.unwrap();
    handle.cancel();

    assert!(stream.next().await.is_none());
    assert!(stream.is_closed());
    drop(stream);
    assert!(client.historical().is_empty());
}

#[tokio::test]
async fn closing_early_keeps_the_recorded_turn() {
    let mut fixture = MockServerFixture::new().await;
    let a = delta_line("a");
    let b = delta_line("b");
    let _mock = fixture
        .mock_sse("/v1/chat/completions", &[&a, &b, "data: [DONE]"])
        .await;

    let mut client = fixture.builder().record_replies(true).build().unwrap();
    let mut stream = client.chat_stream("hi").await.unwrap();
    assert_eq!(stream.next().await.unwrap().unwrap(), "a");
    stream.close();
    assert!(stream.next().await.is_none());
    drop(stream);

    // Reply was cut short, so only the user turn is kept.
    assert_eq!(client.historical(), vec!["hi"]);
}
