//! Mock HTTP server setup for integration tests

use ai_lib_gpt::{AiClient, AiClientBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const API_KEY: &str = "sk-test";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    /// Create a test client pointed at the mock server
    pub fn client(&self) -> AiClient {
        self.builder().build().unwrap()
    }

    pub fn builder(&self) -> AiClientBuilder {
        AiClientBuilder::new(API_KEY).base_url(&self.base_url)
    }

    /// Create a mock for a successful JSON response
    pub async fn mock_json(&mut self, path: &str, body: &str) -> Mock {
        self.server
            .mock("POST", path)
            .match_header("authorization", format!("Bearer {API_KEY}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Like [`Self::mock_json`], also requiring the request body to contain `expected`.
    pub async fn mock_json_matching(
        &mut self,
        path: &str,
        expected: serde_json::Value,
        body: &str,
    ) -> Mock {
        self.server
            .mock("POST", path)
            .match_body(Matcher::PartialJson(expected))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for a successful streaming response (SSE).
    ///
    /// Each entry becomes one line; entries without a `data: ` prefix are sent as-is.
    pub async fn mock_sse(&mut self, path: &str, lines: &[&str]) -> Mock {
        let body = lines
            .iter()
            .map(|line| format!("{line}\n"))
            .collect::<String>();
        self.server
            .mock("POST", path)
            .match_body(Matcher::PartialJson(serde_json::json!({ "stream": true })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for an error response
    pub async fn mock_error(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", path)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }
}

/// Buffered chat reply with a single choice carrying `content`.
pub fn chat_reply(content: &str) -> String {
    serde_json::json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "index": 0,
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7 }
    })
    .to_string()
}

/// One `data: ` line of a streamed chat reply.
pub fn delta_line(content: &str) -> String {
    format!(
        "data: {}",
        serde_json::json!({
            "choices": [{ "delta": { "content": content }, "index": 0, "finish_reason": null }]
        })
    )
}
