use anyhow::Result;
use log::debug;

use streamchat_api::ChatBackend;
use streamchat_stream::{
    extract_thinking_segment, strip_thinking_segment, StreamPump, StreamStats, TotalUsage,
};

use crate::memory::Memory;

/// Result of one completed exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Everything the pump accepted, thinking block included when visible
    pub full_response: String,
    pub stats: StreamStats,
}

impl Turn {
    /// The reply without its thinking block
    pub fn answer(&self) -> String {
        strip_thinking_segment(&self.full_response)
    }

    /// The thinking block with delimiters, or an empty string
    pub fn thinking(&self) -> String {
        extract_thinking_segment(&self.full_response)
    }
}

/// A running conversation: history plus the backend that continues it.
pub struct Conversation<B> {
    backend: B,
    pump: StreamPump,
    memory: Memory,
}

impl<B: ChatBackend> Conversation<B> {
    pub fn new(backend: B, pump: StreamPump) -> Self {
        Self {
            backend,
            pump,
            memory: Memory::new(),
        }
    }

    /// Start the history with a system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.memory.add_system_message(prompt);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn stats(&self) -> StreamStats {
        self.pump.stats().snapshot()
    }

    pub fn total_usage(&self) -> TotalUsage {
        self.pump.stats().totals()
    }

    /// Send a user message and stream the reply.
    ///
    /// `on_fragment` sees every forwarded fragment while the stream is still
    /// being drained. The user message stays in the history even when the
    /// exchange fails; the assistant reply is only recorded on success.
    pub async fn send<F>(&mut self, user_message: &str, mut on_fragment: F) -> Result<Turn>
    where
        F: FnMut(&str),
    {
        self.memory.add_user_message(user_message);
        debug!("sending {} messages", self.memory.len());

        let events = self.backend.open_stream(self.memory.messages()).await?;
        let mut handle = self.pump.spawn(events);
        while let Some(fragment) = handle.recv().await {
            on_fragment(&fragment);
        }
        let full_response = handle.finish().await?;

        self.memory.add_assistant_message(&full_response);
        Ok(Turn {
            full_response,
            stats: self.pump.stats().snapshot(),
        })
    }
}
