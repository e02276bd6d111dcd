//! Chat fallback: sends the line to the response generator and streams the
//! reply back.

use super::core::{Context, Handler, Output, Producer};
use crate::error::{HandlerError, HandlerResult, RenderError};
use crate::generator::{Conversation, ResponseGenerator};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Written before a reply to a typed line.
pub const REPLY_LEAD: &[u8] = b"\r\n";

/// Written before each intro reply.
pub const INTRO_LEAD: &[u8] = b"\r\n\r\n";

pub struct ChatProducer;

impl Producer for ChatProducer {
    fn produce(&self, ctx: &Context<'_>, _name: &str, _args: &[String]) -> Box<dyn Handler> {
        Box::new(ChatHandler {
            line: ctx.line.to_string(),
        })
    }
}

pub struct ChatHandler {
    line: String,
}

#[async_trait]
impl Handler for ChatHandler {
    async fn run(&mut self, ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult {
        exchange(ctx.conversation, ctx.generator, out, &self.line, REPLY_LEAD).await?;
        Ok(())
    }
}

/// Run one user → assistant exchange.
///
/// The user line is appended to `conversation` first; the reply is appended
/// only when the stream completes. On any failure the user line is rolled
/// back so the conversation never holds an unanswered prompt. Returns the
/// number of fragments streamed.
pub async fn exchange(
    conversation: &mut Conversation,
    generator: &Arc<dyn ResponseGenerator>,
    out: &mut Output<'_>,
    line: &str,
    lead: &[u8],
) -> Result<usize, HandlerError> {
    conversation.push_user(line);
    if let Err(e) = out.write_raw(lead).await {
        conversation.rollback();
        return Err(e.into());
    }

    let fragments = generator.stream(conversation.messages().to_vec());
    match out.render(fragments).await {
        Ok(rendered) => {
            debug!(
                generator = generator.name(),
                fragments = rendered.fragments,
                bytes = rendered.text.len(),
                "reply streamed"
            );
            conversation.commit_reply(rendered.text);
            Ok(rendered.fragments)
        }
        Err(err) => {
            conversation.rollback();
            if let RenderError::Generator { source, .. } = &err {
                crate::metrics::record_generator_error(source.error_code());
            }
            Err(err.into())
        }
    }
}
