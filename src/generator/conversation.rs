//! Per-session conversation history.

use super::{ChatMessage, Role};
use crate::config::GeneratorConfig;

/// Append-only conversation context owned by one session.
///
/// The first `seed_len` messages (system prompt and configured seed
/// messages) are never dropped. With `max_history > 0` only the most recent
/// `max_history` exchanges are kept after the seed.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    seed_len: usize,
    max_history: usize,
}

impl Conversation {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut messages = Vec::with_capacity(config.seed_messages.len() + 1);
        if let Some(system) = &config.system_prompt {
            messages.push(ChatMessage::new(Role::System, system.clone()));
        }
        messages.extend(
            config
                .seed_messages
                .iter()
                .map(|m| ChatMessage::new(m.role, m.content.clone())),
        );
        Self {
            seed_len: messages.len(),
            messages,
            max_history: config.max_history,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages added since the seed.
    pub fn history_len(&self) -> usize {
        self.messages.len() - self.seed_len
    }

    /// Append a user line, without its terminator.
    pub fn push_user(&mut self, line: &str) {
        let content = line.trim_end_matches(['\r', '\n']);
        self.messages.push(ChatMessage::new(Role::User, content));
    }

    /// Append the assistant's full reply and apply the history bound.
    pub fn commit_reply(&mut self, reply: String) {
        self.messages.push(ChatMessage::new(Role::Assistant, reply));
        self.enforce_bound();
    }

    /// Drop a trailing user message whose reply never arrived.
    pub fn rollback(&mut self) {
        if self.history_len() > 0 && self.messages.last().is_some_and(|m| m.role == Role::User) {
            self.messages.pop();
        }
    }

    /// Forget everything but the seed.
    pub fn reset(&mut self) {
        self.messages.truncate(self.seed_len);
    }

    fn enforce_bound(&mut self) {
        if self.max_history == 0 {
            return;
        }
        let keep = self.max_history * 2;
        let history = self.history_len();
        if history > keep {
            let excess = history - keep;
            self.messages.drain(self.seed_len..self.seed_len + excess);
        }
    }
}
