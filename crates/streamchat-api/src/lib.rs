//! # streamchat-api
//!
//! Streaming transport for OpenAI-compatible chat completion endpoints.
//!
//! [`ChatClient`] posts a streaming request, decodes the server-sent events
//! into [`TransportEvent`](streamchat_stream::TransportEvent)s and hands them
//! to a [`StreamPump`](streamchat_stream::StreamPump).
//!
//! ```rust,no_run
//! use streamchat_api::{ChatClient, ClientConfig};
//! use streamchat_models::Message;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ChatClient::new(ClientConfig::new(
//!         "your-api-key",
//!         "http://localhost:11434/v1",
//!         "qwen3:8b",
//!     ));
//!
//!     let messages = vec![Message::user("Hello!")];
//!     let mut handle = client.stream_response(&messages, true).await?;
//!     while let Some(fragment) = handle.recv().await {
//!         print!("{fragment}");
//!     }
//!     let response = handle.finish().await?;
//!     println!("\n{} tokens", client.stats().total_tokens());
//!     assert!(!response.is_empty());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod model_info;
pub mod sse;

pub use client::{ChatBackend, ChatClient, ClientConfig, EventStream, OPENAI_BASE_URL};
pub use error::ApiError;
pub use model_info::{ollama_base_url, ModelInfo};
pub use sse::decode_event_stream;
