//! # streamchat-stream
//!
//! Streaming response processing for OpenAI-compatible chat completions.
//!
//! A [`StreamPump`] drains a stream of [`TransportEvent`]s, separates the
//! `<think>` reasoning segment from the visible answer, forwards accepted
//! fragments to a live consumer and keeps token and timing statistics in a
//! shared [`UsageAccumulator`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use futures::stream;
//! use streamchat_stream::{StreamPump, TransportEvent, UsageAccumulator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let stats = Arc::new(UsageAccumulator::new());
//!     let pump = StreamPump::new(Arc::clone(&stats), true);
//!
//!     let events = stream::iter(vec![
//!         Ok::<_, anyhow::Error>(TransportEvent::content("<think>")),
//!         Ok(TransportEvent::content("hmm")),
//!         Ok(TransportEvent::content("</think>")),
//!         Ok(TransportEvent::content("Hello!")),
//!         Ok(TransportEvent::usage(12, 4)),
//!     ]);
//!
//!     let mut handle = pump.spawn(events);
//!     while let Some(fragment) = handle.recv().await {
//!         print!("{fragment}");
//!     }
//!     let response = handle.finish().await?;
//!     println!("\n{} | {:?}", response, stats.snapshot());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod pump;
pub mod segment;
pub mod stats;
pub mod thinking;

pub use error::StreamError;
pub use pump::{
    ContentDelta,
    StreamHandle,
    StreamPump,
    TransportEvent,
    UsageSummary,
    FORWARD_CHANNEL_CAPACITY,
};
pub use segment::{Fragment, SegmentClassifier, SegmentKind, THINK_END, THINK_START};
pub use stats::{StreamStats, TotalUsage, UsageAccumulator};
pub use thinking::{extract_thinking_segment, strip_thinking_segment};
