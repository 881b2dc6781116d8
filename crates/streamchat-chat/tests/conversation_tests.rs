use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::stream;
use pretty_assertions::assert_eq;

use streamchat_api::{ChatBackend, EventStream};
use streamchat_chat::Conversation;
use streamchat_models::{Message, Role};
use streamchat_stream::{StreamError, StreamPump, TransportEvent, UsageAccumulator};

/// Replays canned replies and records the history it was sent
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<Vec<Vec<Result<TransportEvent>>>>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedBackend {
    fn new(mut replies: Vec<Vec<Result<TransportEvent>>>) -> Self {
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn open_stream(&self, messages: &[Message]) -> Result<EventStream> {
        self.seen.lock().unwrap().push(messages.to_vec());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| anyhow!("no reply scripted"))?;
        Ok(Box::pin(stream::iter(reply)))
    }
}

fn reply(fragments: &[&str], usage: (u64, u64)) -> Vec<Result<TransportEvent>> {
    let mut events: Vec<Result<TransportEvent>> =
        fragments.iter().map(|f| Ok(TransportEvent::content(*f))).collect();
    events.push(Ok(TransportEvent::usage(usage.0, usage.1)));
    events
}

fn conversation(
    replies: Vec<Vec<Result<TransportEvent>>>,
    hide_thinking: bool,
) -> Conversation<ScriptedBackend> {
    let pump = StreamPump::new(Arc::new(UsageAccumulator::new()), hide_thinking);
    Conversation::new(ScriptedBackend::new(replies), pump).with_system_prompt("be brief")
}

#[tokio::test]
async fn history_grows_and_skips_thinking() {
    let mut chat = conversation(
        vec![
            reply(&["<think>", "ponder", "</think>", "\n\nHi!"], (12, 5)),
            reply(&["Still here."], (30, 3)),
        ],
        false,
    );

    let mut printed = String::new();
    let turn = chat.send("hello", |f| printed.push_str(f)).await.unwrap();
    assert_eq!(printed, "<think>ponder</think>\n\nHi!");
    assert_eq!(turn.thinking(), "<think>ponder</think>");
    assert_eq!(turn.answer(), "Hi!");
    assert_eq!(turn.stats.total_tokens(), 17);

    chat.send("again", |_| {}).await.unwrap();

    let seen = chat.backend().seen.lock().unwrap().clone();
    assert_eq!(seen[0].len(), 2);
    assert_eq!(
        seen[1],
        vec![
            Message::system("be brief"),
            Message::user("hello"),
            Message::assistant("Hi!"),
            Message::user("again"),
        ]
    );
    assert_eq!(chat.memory().len(), 5);
    assert_eq!(chat.total_usage().combined(), 50);
}

#[tokio::test]
async fn hidden_thinking_never_reaches_the_callback() {
    let mut chat = conversation(vec![reply(&["<think>", "x", "</think>", "ok"], (1, 1))], true);

    let mut printed = Vec::new();
    let turn = chat.send("q", |f| printed.push(f.to_string())).await.unwrap();
    assert_eq!(printed, vec!["ok"]);
    assert_eq!(turn.full_response, "ok");
    assert_eq!(turn.thinking(), "");
}

#[tokio::test]
async fn failed_turn_keeps_user_message_only() {
    let mut chat = conversation(
        vec![vec![
            Ok(TransportEvent::content("part")),
            Err(anyhow!("connection reset")),
        ]],
        false,
    );

    let mut printed = String::new();
    let err = chat.send("q", |f| printed.push_str(f)).await.unwrap_err();
    assert_eq!(printed, "part");

    let stream_err = err.downcast_ref::<StreamError>().unwrap();
    assert_eq!(stream_err.partial_response(), "part");
    assert_eq!(chat.memory().len(), 2);
    assert_eq!(chat.memory().messages().last().map(|m| m.role), Some(Role::User));
}

#[tokio::test]
async fn backend_failure_is_returned_before_streaming() {
    let mut chat = conversation(Vec::new(), false);

    let err = chat.send("q", |_| panic!("nothing to forward")).await.unwrap_err();
    assert!(err.to_string().contains("no reply scripted"));
    assert_eq!(chat.stats().total_tokens(), 0);
}
