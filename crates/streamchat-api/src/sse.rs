use anyhow::{bail, Context, Result};
use async_stream::stream;
use futures::{Stream, StreamExt};

use streamchat_logging::log_stream_chunk;
use streamchat_models::StreamChunk;
use streamchat_stream::{ContentDelta, TransportEvent, UsageSummary};

/// Payload of one server-sent event
#[derive(Debug, PartialEq)]
enum SseData {
    Done,
    Event(TransportEvent),
}

/// Join the `data:` lines of one event block. Returns `None` for blocks
/// without data (comments, keep-alives, `event:`-only blocks).
fn event_data(block: &str) -> Option<String> {
    let mut data_lines = Vec::new();
    for line in block.lines() {
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

fn decode_data(data: &str) -> Result<SseData> {
    if data.trim() == "[DONE]" {
        return Ok(SseData::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(data)
        .with_context(|| format!("malformed stream event: {}", data))?;
    if let Some(message) = chunk.error_message() {
        bail!("received error while streaming: {}", message);
    }

    let content = chunk.choices.into_iter().next().and_then(|choice| {
        choice.delta.content.map(|text| ContentDelta { text, index: choice.index })
    });
    let usage = chunk.usage.map(|usage| UsageSummary {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
    });

    Ok(SseData::Event(TransportEvent { content, usage }))
}

/// Position of the first blank line separating two events
fn find_event_boundary(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Decode an OpenAI-style SSE byte stream into transport events.
///
/// The stream ends at `[DONE]` or when the body ends. A body read error or a
/// malformed event is yielded as the final item.
pub fn decode_event_stream<S, B, E>(bytes: S, verbose: bool) -> impl Stream<Item = Result<TransportEvent>> + Send
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    stream! {
        futures::pin_mut!(bytes);
        // Raw bytes are kept until a whole event is present so multi-byte
        // characters split across reads decode correctly.
        let mut pending: Vec<u8> = Vec::new();
        let mut chunk_counter = 0usize;
        let mut body_ended = false;

        loop {
            let block = match find_event_boundary(&pending) {
                Some(pos) => {
                    let block: Vec<u8> = pending.drain(..pos + 2).collect();
                    block
                }
                None if body_ended => {
                    if pending.iter().all(u8::is_ascii_whitespace) {
                        return;
                    }
                    std::mem::take(&mut pending)
                }
                None => {
                    match bytes.next().await {
                        Some(Ok(chunk)) => {
                            pending.extend(chunk.as_ref().iter().copied().filter(|b| *b != b'\r'));
                        }
                        Some(Err(e)) => {
                            yield Err(anyhow::Error::new(e).context("error reading event stream"));
                            return;
                        }
                        None => body_ended = true,
                    }
                    continue;
                }
            };

            let text = String::from_utf8_lossy(&block);
            let Some(data) = event_data(&text) else {
                continue;
            };

            chunk_counter += 1;
            log_stream_chunk(chunk_counter, &data, verbose);

            match decode_data(&data) {
                Ok(SseData::Done) => return,
                Ok(SseData::Event(event)) => yield Ok(event),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    }
}
