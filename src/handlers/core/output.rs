//! Client-facing writer handed to handlers.
//!
//! Every write is flushed immediately: the client is a terminal and partial
//! output should appear as soon as it exists.

use crate::error::RenderError;
use crate::generator::FragmentStream;
use crate::render::{Rendered, ResponseRenderer};
use std::io;
use telchat_proto::to_crlf;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub struct Output<'a> {
    writer: &'a mut (dyn AsyncWrite + Unpin + Send),
}

impl<'a> Output<'a> {
    pub fn new(writer: &'a mut (dyn AsyncWrite + Unpin + Send)) -> Self {
        Self { writer }
    }

    /// Write bytes unchanged.
    pub async fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await
    }

    /// Write text with bare `\n` rewritten to `\r\n`.
    pub async fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.write_raw(to_crlf(text).as_bytes()).await
    }

    /// Stream a generated response.
    pub async fn render(&mut self, fragments: FragmentStream) -> Result<Rendered, RenderError> {
        ResponseRenderer::new().render(&mut *self.writer, fragments).await
    }
}
