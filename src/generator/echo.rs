//! Offline backend that streams the latest user message back, word by word.

use super::{ChatMessage, FragmentStream, ResponseGenerator, Role};
use crate::error::GeneratorError;
use std::time::Duration;

pub struct EchoGenerator {
    delay: Duration,
}

impl EchoGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl ResponseGenerator for EchoGenerator {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn stream(&self, messages: Vec<ChatMessage>) -> FragmentStream {
        let delay = self.delay;
        let text = messages
            .into_iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content)
            .unwrap_or_default();

        Box::pin(async_stream::stream! {
            for (i, word) in text.split_inclusive(char::is_whitespace).enumerate() {
                if i > 0 && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok::<_, GeneratorError>(word.to_string());
            }
        })
    }
}
