//! Streaming response renderer.
//!
//! Writes each fragment to the client as soon as the generator yields it,
//! rewriting bare `\n` to `\r\n`, and closes the response with a blank line.

use crate::error::RenderError;
use crate::generator::FragmentStream;
use futures_util::StreamExt;
use telchat_proto::CrlfTranslator;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Written after the last fragment of every response.
pub const TRAILER: &[u8] = b"\r\n\r\n";

/// Outcome of a fully streamed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Concatenated fragments as the generator produced them (no CRLF rewrite).
    pub text: String,
    /// Number of non-empty fragments written.
    pub fragments: usize,
}

/// Streams one response to the client.
///
/// Carries the newline state between fragments, so a `\r\n` split across
/// two fragments is not doubled. Use a fresh renderer per response.
#[derive(Debug, Default)]
pub struct ResponseRenderer {
    translator: CrlfTranslator,
}

impl ResponseRenderer {
    /// Renderer with no carried newline state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream `fragments` into `writer`, one write and flush per fragment.
    ///
    /// Stops at the first generator error; the trailer is only written after
    /// the stream ends cleanly.
    pub async fn render<W>(
        &mut self,
        writer: &mut W,
        mut fragments: FragmentStream,
    ) -> Result<Rendered, RenderError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        self.translator.reset();
        let mut rendered = Rendered::default();

        while let Some(item) = fragments.next().await {
            let fragment = match item {
                Ok(fragment) => fragment,
                Err(source) => {
                    return Err(RenderError::Generator {
                        source,
                        partial: rendered.text,
                    });
                }
            };
            if fragment.is_empty() {
                continue;
            }

            let wire = self.translator.translate(&fragment);
            writer.write_all(wire.as_bytes()).await?;
            writer.flush().await?;
            trace!(bytes = wire.len(), "fragment written");

            rendered.text.push_str(&fragment);
            rendered.fragments += 1;
            crate::metrics::record_fragment();
        }

        writer.write_all(TRAILER).await?;
        writer.flush().await?;
        Ok(rendered)
    }
}
