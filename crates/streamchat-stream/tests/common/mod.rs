//! Shared helpers for stream pump tests.
#![allow(dead_code)]

use std::time::Duration;

use futures::{stream, Stream, StreamExt};
use streamchat_stream::TransportEvent;

/// Events delivered immediately, in order
pub fn events_of(fragments: &[&str]) -> impl Stream<Item = anyhow::Result<TransportEvent>> + Send + 'static {
    let events: Vec<anyhow::Result<TransportEvent>> = fragments
        .iter()
        .map(|f| Ok(TransportEvent::content(*f)))
        .collect();
    stream::iter(events)
}

/// Events each preceded by a delay in milliseconds (use with paused time)
pub fn timed_events(
    items: Vec<(u64, anyhow::Result<TransportEvent>)>,
) -> impl Stream<Item = anyhow::Result<TransportEvent>> + Send + 'static {
    stream::iter(items).then(|(delay_ms, event)| async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        event
    })
}

/// Assert two durations are within two milliseconds of each other
pub fn assert_close(actual: Duration, expected: Duration) {
    let diff = if actual > expected { actual - expected } else { expected - actual };
    assert!(
        diff <= Duration::from_millis(2),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
