#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "qwen3:8b";

/// Mock server utilities for the streaming chat API
pub struct ChatMockServer {
    server: MockServer,
}

impl ChatMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// OpenAI-style base URL (`<uri>/v1`)
    pub fn base_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    /// Mock a streamed completion delivering `fragments` followed by a usage
    /// summary and `[DONE]`
    pub async fn mock_streaming_completion(&self, fragments: &[&str], usage: Option<(u64, u64)>) {
        let body = sse_body(fragments, usage);
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_partial_json(json!({
                "model": TEST_MODEL,
                "stream": true,
                "stream_options": { "include_usage": true }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a completion whose body is cut off by a malformed event
    pub async fn mock_truncated_completion(&self, fragments: &[&str]) {
        let mut body = String::new();
        for fragment in fragments {
            body.push_str(&sse_event(&content_chunk(fragment)));
        }
        body.push_str("data: {\"choices\": [\n\n");
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a completion that reports an error object mid-stream
    pub async fn mock_error_event_completion(&self, fragments: &[&str], message: &str) {
        let mut body = String::new();
        for fragment in fragments {
            body.push_str(&sse_event(&content_chunk(fragment)));
        }
        body.push_str(&sse_event(&json!({
            "error": { "message": message, "type": "server_error" }
        })));
        body.push_str("data: [DONE]\n\n");
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock an API error response
    pub async fn mock_api_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "message": message, "type": "invalid_request_error" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock Ollama's `/api/tags`
    pub async fn mock_ollama_tags(&self, models: &[(&str, u64)]) {
        let models: Vec<Value> = models
            .iter()
            .map(|(name, size)| json!({ "name": name, "size": size }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
            .mount(&self.server)
            .await;
    }

    /// Mock Ollama's `/api/show`
    pub async fn mock_ollama_show(&self, family: &str, parameter_size: &str, quantization: &str) {
        Mock::given(method("POST"))
            .and(path("/api/show"))
            .and(body_json(json!({ "model": TEST_MODEL })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "details": {
                    "family": family,
                    "parameter_size": parameter_size,
                    "quantization_level": quantization
                },
                "model_info": { "general.architecture": family },
                "template": "{{ .Prompt }}",
                "parameters": ""
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_ollama_show_error(&self) {
        Mock::given(method("POST"))
            .and(path("/api/show"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&self.server)
            .await;
    }
}

pub fn content_chunk(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "model": TEST_MODEL,
        "choices": [{ "index": 0, "delta": { "content": text }, "finish_reason": null }]
    })
}

pub fn usage_chunk(prompt_tokens: u64, completion_tokens: u64) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "model": TEST_MODEL,
        "choices": [],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

pub fn sse_event(value: &Value) -> String {
    format!("data: {}\n\n", value)
}

/// Full SSE body: a role delta, the fragments, optional usage, `[DONE]`
pub fn sse_body(fragments: &[&str], usage: Option<(u64, u64)>) -> String {
    let mut body = sse_event(&json!({
        "choices": [{ "index": 0, "delta": { "role": "assistant" } }]
    }));
    for fragment in fragments {
        body.push_str(&sse_event(&content_chunk(fragment)));
    }
    if let Some((prompt, completion)) = usage {
        body.push_str(&sse_event(&usage_chunk(prompt, completion)));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
