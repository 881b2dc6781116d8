use serde::Deserialize;
use std::collections::HashMap;

/// Token usage information from API response
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

// ============================================================================
// Streaming Response Structures
// ============================================================================

/// Streaming chunk from chat API
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
    /// Error object some servers send in place of a chunk
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl StreamChunk {
    /// Human-readable message of an in-stream error, if this chunk is one
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_ref().filter(|e| !e.is_null())?;
        Some(match error.get("message").and_then(|m| m.as_str()) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        })
    }
}

/// Choice structure within streaming chunk
#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Delta structure within streaming choice
#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

// ============================================================================
// Ollama model listing
// ============================================================================

/// Response of `GET /api/tags`
#[derive(Debug, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModelEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

/// Response of `POST /api/show`
#[derive(Debug, Default, Deserialize)]
pub struct OllamaShowResponse {
    #[serde(default)]
    pub details: OllamaModelDetails,
    #[serde(default)]
    pub model_info: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OllamaModelDetails {
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub parameter_size: String,
    #[serde(default)]
    pub quantization_level: String,
}
