use streamchat_models::Message;
use streamchat_stream::strip_thinking_segment;

/// Conversation history for the lifetime of one process.
///
/// Messages are kept in insertion order and never reordered.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    messages: Vec<Message>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::system(content));
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::user(content));
    }

    /// Store an assistant reply with its thinking block removed
    pub fn add_assistant_message(&mut self, full_response: &str) {
        self.add_message(Message::assistant(strip_thinking_segment(full_response)));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamchat_models::Role;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_insertion_order() {
        let mut memory = Memory::new();
        memory.add_system_message("sys");
        memory.add_user_message("hi");
        memory.add_assistant_message("hello");

        let roles: Vec<Role> = memory.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(memory.len(), 3);
        assert_eq!(memory.messages().last().map(|m| m.role), Some(Role::Assistant));
    }

    #[test]
    fn assistant_messages_drop_thinking() {
        let mut memory = Memory::new();
        memory.add_assistant_message("<think>internal</think>\n\nThe answer.");
        assert_eq!(memory.messages()[0].content, "The answer.");
    }

    #[test]
    fn clear_empties_history() {
        let mut memory = Memory::new();
        memory.add_user_message("a");
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.len(), 0);
    }
}
