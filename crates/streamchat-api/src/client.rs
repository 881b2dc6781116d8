use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use futures::Stream;

use streamchat_logging::{log_request, log_request_to_file, log_response};
use streamchat_models::{ChatRequest, Message};
use streamchat_stream::{StreamHandle, StreamPump, StreamStats, TotalUsage, TransportEvent, UsageAccumulator};

use crate::error::ApiError;
use crate::sse::decode_event_stream;

/// Default OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Boxed stream of decoded transport events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<TransportEvent>> + Send>>;

/// Anything that can open a streamed chat completion
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `messages` and return the decoded event stream
    async fn open_stream(&self, messages: &[Message]) -> Result<EventStream>;
}

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub verbose: bool,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            temperature: 0.7,
            verbose: false,
        }
    }
}

/// Streaming chat client for OpenAI-compatible APIs.
///
/// Token totals live as long as the client; every call resets only the
/// per-interaction statistics.
pub struct ChatClient {
    http: reqwest::Client,
    config: ClientConfig,
    stats: Arc<UsageAccumulator>,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            stats: Arc::new(UsageAccumulator::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// A pump feeding this client's statistics
    pub fn pump(&self, hide_thinking: bool) -> StreamPump {
        StreamPump::new(Arc::clone(&self.stats), hide_thinking)
    }

    /// Send `messages` and start draining the response on a background task.
    ///
    /// Fragments arrive through the returned handle; the full response is
    /// available from [`StreamHandle::finish`] once the stream ends.
    pub async fn stream_response(&self, messages: &[Message], hide_thinking: bool) -> Result<StreamHandle> {
        let events = self.open_stream(messages).await?;
        Ok(self.pump(hide_thinking).spawn(events))
    }

    /// Statistics of the current or last interaction
    pub fn stats(&self) -> StreamStats {
        self.stats.snapshot()
    }

    /// Token totals across all interactions of this client
    pub fn total_usage(&self) -> TotalUsage {
        self.stats.totals()
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn open_stream(&self, messages: &[Message]) -> Result<EventStream> {
        let request = ChatRequest::streaming(
            self.config.model.clone(),
            messages.to_vec(),
            self.config.temperature,
        );
        let url = self.completions_url();

        log_request(&url, &request, &self.config.api_key, self.config.verbose);
        if self.config.verbose {
            if let Err(e) = log_request_to_file(&url, &request, &self.config.api_key) {
                eprintln!("{} {:#}", "[Logging error]".yellow(), e);
            }
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            log_response(&status, &headers, &body, self.config.verbose);
            return Err(ApiError::Status { status, body }.into());
        }

        if self.config.verbose {
            println!("\n{}", "📡 Starting streaming response...".bright_cyan());
        }

        let events = decode_event_stream(response.bytes_stream(), self.config.verbose);
        Ok(Box::pin(events))
    }
}
