//! Drives one streamed completion: classify, buffer, forward and time.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::StreamError;
use crate::segment::{Fragment, SegmentClassifier, SegmentKind};
use crate::stats::UsageAccumulator;

/// Forwarding channel capacity; one fragment in flight at most
pub const FORWARD_CHANNEL_CAPACITY: usize = 1;

/// Incremental text for one choice of the completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDelta {
    pub text: String,
    pub index: Option<u32>,
}

/// Cumulative token counts reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSummary {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// One decoded event of the transport stream.
///
/// An event with neither content nor usage is a control frame (for example a
/// chunk with zero choices) and is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportEvent {
    pub content: Option<ContentDelta>,
    pub usage: Option<UsageSummary>,
}

impl TransportEvent {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(ContentDelta { text: text.into(), index: Some(0) }),
            usage: None,
        }
    }

    pub fn usage(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            content: None,
            usage: Some(UsageSummary { prompt_tokens, completion_tokens }),
        }
    }

    pub fn control() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Streaming,
    Completed,
    Failed,
}

impl SessionState {
    /// A session streams once and then ends in exactly one terminal state
    fn can_move_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Idle, SessionState::Streaming)
                | (SessionState::Streaming, SessionState::Completed)
                | (SessionState::Streaming, SessionState::Failed)
        )
    }
}

/// Per-call state. Consumed by [`StreamSession::run`], so a finished session
/// can never be driven again.
struct StreamSession {
    stats: Arc<UsageAccumulator>,
    hide_thinking: bool,
    state: SessionState,
    classifier: SegmentClassifier,
    response_started: bool,
    buffer: String,
    forward: Option<mpsc::Sender<String>>,
}

impl StreamSession {
    fn new(stats: Arc<UsageAccumulator>, hide_thinking: bool, forward: Option<mpsc::Sender<String>>) -> Self {
        Self {
            stats,
            hide_thinking,
            state: SessionState::Idle,
            classifier: SegmentClassifier::new(),
            response_started: false,
            buffer: String::new(),
            forward,
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_move_to(next),
            "illegal stream session transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!("stream session {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    async fn run<S>(mut self, events: S) -> Result<String, StreamError>
    where
        S: Stream<Item = anyhow::Result<TransportEvent>>,
    {
        debug_assert_eq!(self.state, SessionState::Idle);
        self.stats.reset_interaction(Instant::now());
        self.transition(SessionState::Streaming);

        futures::pin_mut!(events);
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => self.handle_event(event).await,
                Err(err) => {
                    self.finalize();
                    self.transition(SessionState::Failed);
                    warn!("stream failed after {} bytes: {:#}", self.buffer.len(), err);
                    return Err(StreamError::new(std::mem::take(&mut self.buffer), err));
                }
            }
        }

        self.finalize();
        self.transition(SessionState::Completed);
        Ok(std::mem::take(&mut self.buffer))
    }

    async fn handle_event(&mut self, event: TransportEvent) {
        if let Some(usage) = event.usage {
            if usage.prompt_tokens > 0 {
                self.stats.record_usage(usage.prompt_tokens, usage.completion_tokens);
            }
        }

        let Some(delta) = event.content else {
            return;
        };
        let text = delta.text;
        if text.is_empty() {
            return;
        }

        let now = Instant::now();
        if !self.response_started {
            self.stats.open_segment(SegmentKind::Response, now);
            self.response_started = true;
        }

        let Some(fragment) = self.classifier.classify(&text) else {
            return;
        };

        match fragment {
            Fragment::EnterThinking => {
                self.stats.open_segment(SegmentKind::Thinking, now);
            }
            Fragment::ExitThinking => {
                self.stats.close_segment(SegmentKind::Thinking, now);
                self.stats.open_segment(SegmentKind::Response, now);
                if self.hide_thinking {
                    return;
                }
            }
            Fragment::Content(_) => {}
        }

        if !self.hide_thinking || fragment.segment() == SegmentKind::Response {
            self.emit(text).await;
        }
    }

    async fn emit(&mut self, text: String) {
        self.buffer.push_str(&text);
        if let Some(forward) = &self.forward {
            if forward.send(text).await.is_err() {
                // Receiver is gone; keep draining so the buffer stays complete.
                debug!("fragment consumer dropped, continuing without forwarding");
                self.forward = None;
            }
        }
    }

    /// Close the open interval, stamp the end time and close the channel.
    fn finalize(&mut self) {
        self.stats.finish(Instant::now());
        drop(self.forward.take());
    }
}

/// Runs streamed completions against a shared [`UsageAccumulator`].
#[derive(Debug, Clone)]
pub struct StreamPump {
    stats: Arc<UsageAccumulator>,
    hide_thinking: bool,
}

impl StreamPump {
    pub fn new(stats: Arc<UsageAccumulator>, hide_thinking: bool) -> Self {
        Self { stats, hide_thinking }
    }

    pub fn stats(&self) -> &Arc<UsageAccumulator> {
        &self.stats
    }

    /// Drain `events` to completion on the current task.
    ///
    /// Accepted fragments are sent to `forward` (if given) in arrival order;
    /// the sender is dropped before this returns, which closes the channel.
    pub async fn run<S>(&self, events: S, forward: Option<mpsc::Sender<String>>) -> Result<String, StreamError>
    where
        S: Stream<Item = anyhow::Result<TransportEvent>>,
    {
        StreamSession::new(Arc::clone(&self.stats), self.hide_thinking, forward)
            .run(events)
            .await
    }

    /// Drain `events` on a dedicated task and hand fragments to the caller
    /// through a size-1 channel.
    pub fn spawn<S>(&self, events: S) -> StreamHandle
    where
        S: Stream<Item = anyhow::Result<TransportEvent>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(FORWARD_CHANNEL_CAPACITY);
        let pump = self.clone();
        let task = tokio::spawn(async move { pump.run(events, Some(tx)).await });
        StreamHandle { fragments: rx, task }
    }
}

/// Consumer side of a spawned stream
#[derive(Debug)]
pub struct StreamHandle {
    fragments: mpsc::Receiver<String>,
    task: JoinHandle<Result<String, StreamError>>,
}

impl StreamHandle {
    /// Next forwarded fragment; `None` once the pump has closed the channel.
    pub async fn recv(&mut self) -> Option<String> {
        self.fragments.recv().await
    }

    /// Drain any fragments not yet received, then wait for the full response.
    pub async fn finish(mut self) -> Result<String, StreamError> {
        while self.fragments.recv().await.is_some() {}
        match self.task.await {
            Ok(result) => result,
            Err(join_error) => Err(StreamError::new(String::new(), anyhow::Error::new(join_error))),
        }
    }
}
