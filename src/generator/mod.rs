//! Response generators.
//!
//! A [`ResponseGenerator`] turns a conversation into a lazy stream of text
//! fragments. The session core only ever sees this trait; which backend sits
//! behind it is decided once at startup by [`build`].

mod conversation;
mod echo;
mod openai;

pub use conversation::Conversation;
pub use echo::EchoGenerator;
pub use openai::OpenAiGenerator;

use crate::config::{Backend, GeneratorConfig};
use crate::error::GeneratorError;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;

/// Speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered, lazy, finite sequence of reply fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, GeneratorError>> + Send + 'static>>;

/// Capability that streams a reply for the given conversation.
pub trait ResponseGenerator: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Start streaming the reply to `messages`. Nothing happens until the
    /// returned stream is polled.
    fn stream(&self, messages: Vec<ChatMessage>) -> FragmentStream;
}

/// Build the configured generator.
pub fn build(config: &GeneratorConfig) -> Result<Arc<dyn ResponseGenerator>, GeneratorError> {
    let generator: Arc<dyn ResponseGenerator> = match config.backend {
        Backend::OpenAi => Arc::new(OpenAiGenerator::new(config)?),
        Backend::Echo => Arc::new(EchoGenerator::new(config.fragment_delay())),
    };
    Ok(generator)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_serializes_lowercase_role() {
        let msg = ChatMessage::new(Role::Assistant, "GREETINGS");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"GREETINGS"}"#);
    }

    #[test]
    fn build_selects_backend() {
        let config = GeneratorConfig {
            backend: Backend::Echo,
            ..GeneratorConfig::default()
        };
        assert_eq!(build(&config).unwrap().name(), "echo");

        let config = GeneratorConfig::default();
        assert_eq!(build(&config).unwrap().name(), "openai");
    }
}
