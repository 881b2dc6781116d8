use serde::Serialize;
use super::types::Message;

/// Streaming options for chat completions
#[derive(Debug, Clone, Serialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// Chat API request structure
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

impl ChatRequest {
    /// Build a streaming request that asks the server to append a usage summary
    pub fn streaming(model: impl Into<String>, messages: Vec<Message>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            stream: Some(true),
            stream_options: Some(StreamOptions { include_usage: true }),
        }
    }
}
