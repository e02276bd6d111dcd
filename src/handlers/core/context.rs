//! Command handler context.
//!
//! Defines the `Context<'a>` struct passed to producers and handlers. It
//! borrows the session-owned state a command may touch.

use super::registry::Registry;
use crate::generator::{Conversation, ResponseGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use uuid::Uuid;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Session identifier, for logs.
    pub session_id: Uuid,
    /// Remote address of the client.
    pub remote_addr: SocketAddr,
    /// The completed line as typed, terminator included.
    pub line: &'a str,
    /// Conversation owned by this session.
    pub conversation: &'a mut Conversation,
    /// Shared response generator.
    pub generator: &'a Arc<dyn ResponseGenerator>,
    /// Command registry (for `help` and usage statistics).
    pub registry: &'a Arc<Registry>,
}
