//! Model details from an Ollama server that also exposes the OpenAI API.

use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use serde::Serialize;

use streamchat_models::{OllamaShowResponse, OllamaTagsResponse};

use crate::client::ChatClient;
use crate::error::ApiError;

const MODEL_INFO_TIMEOUT: Duration = Duration::from_secs(30);
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub size_mb: u64,
    pub family: String,
    pub parameter_size: String,
    pub quantization: String,
    pub api_endpoint: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

/// Ollama root URL for an OpenAI-compatible base URL (`.../v1` stripped)
pub fn ollama_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    trimmed.strip_suffix("/v1").unwrap_or(trimmed).to_string()
}

fn or_unknown(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

impl ChatClient {
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.timeout(MODEL_INFO_TIMEOUT);
        if self.config().api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config().api_key)
        }
    }

    /// Look up the configured model via `/api/tags` and `/api/show`.
    ///
    /// A failing `/api/show` call is not an error; the detail fields then
    /// read `Unknown`.
    pub async fn model_info(&self) -> Result<ModelInfo, ApiError> {
        let root = ollama_base_url(&self.config().base_url);
        let model = self.config().model.clone();

        let response = self
            .authorized(self.http().get(format!("{}/api/tags", root)))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        let tags: OllamaTagsResponse = response.json().await?;

        let entry = tags.models.iter().find(|m| m.name == model).cloned();
        let Some(entry) = entry else {
            return Err(ApiError::ModelNotFound {
                model,
                available: tags.models.into_iter().map(|m| m.name).collect(),
            });
        };

        let show = self.fetch_model_details(&root, &model).await;

        Ok(ModelInfo {
            name: entry.name,
            size_mb: entry.size / (1024 * 1024),
            family: or_unknown(show.details.family),
            parameter_size: or_unknown(show.details.parameter_size),
            quantization: or_unknown(show.details.quantization_level),
            api_endpoint: root,
            details: show.model_info,
        })
    }

    async fn fetch_model_details(&self, root: &str, model: &str) -> OllamaShowResponse {
        let request = self
            .authorized(self.http().post(format!("{}/api/show", root)))
            .json(&serde_json::json!({ "model": model }));

        let response = match request.send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("/api/show returned {}", response.status());
                return OllamaShowResponse::default();
            }
            Err(e) => {
                debug!("/api/show failed: {}", e);
                return OllamaShowResponse::default();
            }
        };

        response.json().await.unwrap_or_else(|e| {
            debug!("could not decode /api/show response: {}", e);
            OllamaShowResponse::default()
        })
    }
}
