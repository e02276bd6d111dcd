//! Session - drives one client connection.
//!
//! Each Session runs in its own Tokio task and owns all per-connection state:
//!
//! ```text
//! welcome → intro exchanges → prompt
//!    ↓
//! AwaitingInput ──byte──▶ LineEditor ──echo──▶ client
//!    │                       │
//!    │                  line complete
//!    │                       ▼
//!    │                 LineComplete ── blank ──▶ PromptReissued
//!    │                       │
//!    │                  exit command ──▶ Terminated
//!    │                       ▼
//!    │                  Dispatching ──▶ Registry ──▶ Handler ──▶ client
//!    │                       ▼
//!    └──────────────── PromptReissued
//! ```
//!
//! Processing inside a session is strictly sequential: the next byte is not
//! read until the current line has been fully handled.

mod error_handling;

use error_handling::{ReadErrorAction, classify_read_error, handler_error_reply};

use crate::config::SessionConfig;
use crate::error::{HandlerError, SessionError};
use crate::generator::{Conversation, ResponseGenerator};
use crate::handlers::chat::{INTRO_LEAD, exchange};
use crate::handlers::{Context, Output, Registry};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use telchat_proto::{LineEditor, Step, eq_command, tokenize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

const READ_BUF_SIZE: usize = 1024;

/// Where the session is in its read → dispatch → prompt cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the next byte from the client.
    AwaitingInput,
    /// The editor produced a line; not yet classified.
    LineComplete,
    /// A handler is running for the line.
    Dispatching,
    /// The prompt was written again.
    PromptReissued,
    /// No more reads or writes follow.
    Terminated,
}

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client typed the exit command.
    ExitCommand,
    /// The client closed the connection.
    Disconnected,
    /// No input arrived within the idle timeout.
    IdleTimeout,
}

/// State shared by every session, handed out by the gateway.
#[derive(Clone)]
pub struct Shared {
    pub config: Arc<SessionConfig>,
    pub registry: Arc<Registry>,
    pub generator: Arc<dyn ResponseGenerator>,
    /// Seeded conversation each session starts from.
    pub seed: Arc<Conversation>,
}

enum ReadOutcome {
    Data(usize),
    Eof,
    Closed,
    Idle,
    Failed(std::io::Error),
}

/// A client session.
pub struct Session {
    id: Uuid,
    addr: SocketAddr,
    config: Arc<SessionConfig>,
    registry: Arc<Registry>,
    generator: Arc<dyn ResponseGenerator>,
    conversation: Conversation,
    editor: LineEditor,
    phase: Phase,
}

impl Session {
    pub fn new(id: Uuid, addr: SocketAddr, shared: &Shared) -> Self {
        Self {
            id,
            addr,
            editor: LineEditor::with_max_len(shared.config.max_line_len),
            config: Arc::clone(&shared.config),
            registry: Arc::clone(&shared.registry),
            generator: Arc::clone(&shared.generator),
            conversation: Conversation::clone(&shared.seed),
            phase: Phase::AwaitingInput,
        }
    }

    /// Run the session over `stream` until it terminates.
    #[instrument(skip_all, name = "session", fields(session = %self.id, addr = %self.addr))]
    pub async fn run<S>(mut self, mut stream: S) -> Result<SessionEnd, SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        write(&mut stream, self.config.welcome_message.as_bytes()).await?;
        self.run_intro(&mut stream).await?;
        write(&mut stream, self.config.prompt.as_bytes()).await?;

        let mut buf = [0u8; READ_BUF_SIZE];
        let mut echo = BytesMut::with_capacity(READ_BUF_SIZE);

        loop {
            self.transition(Phase::AwaitingInput);
            let n = match read(&mut stream, &mut buf, self.config.idle_timeout()).await {
                ReadOutcome::Data(n) => n,
                ReadOutcome::Eof => return self.close(&mut stream, SessionEnd::Disconnected).await,
                ReadOutcome::Idle => {
                    debug!("idle timeout");
                    return self.close(&mut stream, SessionEnd::IdleTimeout).await;
                }
                ReadOutcome::Closed => {
                    self.transition(Phase::Terminated);
                    return Ok(SessionEnd::Disconnected);
                }
                ReadOutcome::Failed(e) => {
                    warn!(error = %e, "read failed");
                    if let Err(write_err) = self.close(&mut stream, SessionEnd::Disconnected).await {
                        debug!(error = %write_err, "exit message not delivered");
                    }
                    return Err(SessionError::Read(e));
                }
            };

            for &byte in &buf[..n] {
                match self.editor.consume(byte, &mut echo) {
                    Step::Pending | Step::Terminated => {}
                    Step::Blank => {
                        flush_echo(&mut stream, &mut echo).await?;
                        self.transition(Phase::LineComplete);
                        self.reprompt(&mut stream).await?;
                    }
                    Step::Line(line) => {
                        flush_echo(&mut stream, &mut echo).await?;
                        self.transition(Phase::LineComplete);
                        if let Some(end) = self.process_line(&mut stream, &line).await? {
                            return Ok(end);
                        }
                    }
                }
            }
            flush_echo(&mut stream, &mut echo).await?;
        }
    }

    /// Handle one completed line. Returns `Some` when the session is over.
    async fn process_line<S>(
        &mut self,
        stream: &mut S,
        line: &str,
    ) -> Result<Option<SessionEnd>, SessionError>
    where
        S: AsyncWrite + Unpin + Send,
    {
        let tokens = tokenize(line);
        let Some((name, args)) = tokens.split_first() else {
            self.reprompt(stream).await?;
            return Ok(None);
        };
        crate::metrics::record_line();

        if eq_command(name, &self.config.exit_command) {
            self.editor.finish();
            return self.close(stream, SessionEnd::ExitCommand).await.map(Some);
        }

        self.transition(Phase::Dispatching);
        let result = {
            let mut ctx = Context {
                session_id: self.id,
                remote_addr: self.addr,
                line,
                conversation: &mut self.conversation,
                generator: &self.generator,
                registry: &self.registry,
            };
            let mut out = Output::new(&mut *stream);
            self.registry.dispatch(&mut ctx, &mut out, name, args).await
        };

        match result {
            None => debug!(command = %name, "no handler for line"),
            Some(Ok(())) => {}
            Some(Err(HandlerError::Write(e))) => {
                self.transition(Phase::Terminated);
                return Err(SessionError::Write(e));
            }
            Some(Err(e)) => {
                warn!(command = %name, error = %e, "command failed");
                if let Some(reply) = handler_error_reply(&self.config, &e) {
                    write(stream, reply.as_bytes()).await?;
                }
            }
        }

        self.reprompt(stream).await?;
        Ok(None)
    }

    /// Stream the configured intro exchanges. Failures are logged and skipped.
    async fn run_intro<S>(&mut self, stream: &mut S) -> Result<(), SessionError>
    where
        S: AsyncWrite + Unpin + Send,
    {
        for prompt in self.config.intro.iter() {
            let mut out = Output::new(&mut *stream);
            match exchange(&mut self.conversation, &self.generator, &mut out, prompt, INTRO_LEAD).await {
                Ok(fragments) => trace!(fragments, "intro exchange done"),
                Err(HandlerError::Write(e)) => return Err(SessionError::Write(e)),
                Err(e) => warn!(error = %e, "intro exchange failed"),
            }
        }
        Ok(())
    }

    async fn reprompt<S>(&mut self, stream: &mut S) -> Result<(), SessionError>
    where
        S: AsyncWrite + Unpin + Send,
    {
        self.transition(Phase::PromptReissued);
        write(stream, self.config.prompt.as_bytes()).await
    }

    /// Write the exit message and end the session.
    async fn close<S>(&mut self, stream: &mut S, end: SessionEnd) -> Result<SessionEnd, SessionError>
    where
        S: AsyncWrite + Unpin + Send,
    {
        self.transition(Phase::Terminated);
        write(stream, self.config.exit_message.as_bytes()).await?;
        Ok(end)
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            trace!(from = ?self.phase, to = ?next, "phase");
            self.phase = next;
        }
    }
}

async fn read<S>(stream: &mut S, buf: &mut [u8], idle: Option<Duration>) -> ReadOutcome
where
    S: AsyncRead + Unpin,
{
    loop {
        let result = match idle {
            Some(limit) => match tokio::time::timeout(limit, stream.read(buf)).await {
                Ok(result) => result,
                Err(_) => return ReadOutcome::Idle,
            },
            None => stream.read(buf).await,
        };
        match result {
            Ok(0) => return ReadOutcome::Eof,
            Ok(n) => return ReadOutcome::Data(n),
            Err(e) => match classify_read_error(&e) {
                ReadErrorAction::Retry => continue,
                ReadErrorAction::Closed => {
                    debug!(error = %e, "connection closed by peer");
                    return ReadOutcome::Closed;
                }
                ReadErrorAction::Fatal => return ReadOutcome::Failed(e),
            },
        }
    }
}

async fn write<S>(stream: &mut S, bytes: &[u8]) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin,
{
    if bytes.is_empty() {
        return Ok(());
    }
    stream.write_all(bytes).await.map_err(SessionError::Write)?;
    stream.flush().await.map_err(SessionError::Write)
}

async fn flush_echo<S>(stream: &mut S, echo: &mut BytesMut) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin,
{
    let result = write(stream, echo).await;
    echo.clear();
    result
}
