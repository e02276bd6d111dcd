//! Error classification for the session loop.

use crate::config::SessionConfig;
use crate::error::HandlerError;
use std::io;

/// What a failed read means for the session.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ReadErrorAction {
    /// Spurious wake-up; read again.
    Retry,
    /// The peer went away. Nothing more can be written.
    Closed,
    /// Unexpected I/O failure.
    Fatal,
}

pub(super) fn classify_read_error(e: &io::Error) -> ReadErrorAction {
    match e.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => ReadErrorAction::Retry,
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => ReadErrorAction::Closed,
        _ => ReadErrorAction::Fatal,
    }
}

/// Text shown to the client after a recoverable handler error.
///
/// Returns None for errors that only get logged.
pub(super) fn handler_error_reply(config: &SessionConfig, error: &HandlerError) -> Option<String> {
    match error {
        HandlerError::Generator(_) => Some(config.error_message.clone()),
        HandlerError::NeedMoreParams(command) => {
            Some(format!("{command}: not enough parameters\r\n"))
        }
        HandlerError::Internal(_) | HandlerError::Write(_) => None,
    }
}
