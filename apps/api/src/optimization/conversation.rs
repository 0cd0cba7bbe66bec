//! Append-only chat history shared by every optimization stage.

use crate::llm_client::{ChatMessage, Role};

/// A system prompt followed by complete user/assistant exchanges.
///
/// A user turn only becomes part of the history together with the assistant's answer,
/// so a failed call never leaves a dangling question behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    #[cfg(test)]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of completed exchanges.
    pub fn exchanges(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::Assistant).count()
    }

    /// The full history with `user_turn` appended, ready to send. Does not modify `self`.
    pub fn with_pending(&self, user_turn: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend_from_slice(&self.messages);
        messages.push(ChatMessage::user(user_turn));
        messages
    }

    /// Records a completed exchange.
    pub fn commit(&mut self, user_turn: String, assistant_reply: String) {
        self.messages.push(ChatMessage::user(user_turn));
        self.messages.push(ChatMessage::assistant(assistant_reply));
    }
}
