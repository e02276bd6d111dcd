//! Unified error handling for telchatd.
//!
//! One enum per layer, with `#[from]` conversions along the paths errors
//! actually travel: generator → renderer → handler → session.

use std::io;
use thiserror::Error;

// ============================================================================
// Generator Errors (response backends)
// ============================================================================

/// Errors raised while producing a streamed response.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed stream event: {0}")]
    Decode(String),

    #[error("stream error: {0}")]
    Stream(String),
}

impl GeneratorError {
    /// Static error code for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::Stream(_) => "stream",
        }
    }
}

// ============================================================================
// Render Errors (streaming to the client)
// ============================================================================

/// Errors raised while streaming fragments to the client.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The client connection failed. Fatal for the session.
    #[error("write to client failed: {0}")]
    Write(#[from] io::Error),

    /// The generator failed mid-stream. `partial` holds what was already shown.
    #[error("generator failed after {} bytes: {source}", .partial.len())]
    Generator {
        #[source]
        source: GeneratorError,
        partial: String,
    },
}

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}: not enough parameters")]
    NeedMoreParams(String),

    #[error("write to client failed: {0}")]
    Write(#[from] io::Error),

    #[error("response generation failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Static error code for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::Write(_) => "write_error",
            Self::Generator(_) => "generator_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether the session can continue after this error.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}

impl From<RenderError> for HandlerError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Write(e) => Self::Write(e),
            RenderError::Generator { source, .. } => Self::Generator(source),
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Session Errors (per-connection loop)
// ============================================================================

/// Errors that end a session. None of them affect other sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("read from client failed: {0}")]
    Read(#[source] io::Error),

    #[error("write to client failed: {0}")]
    Write(#[source] io::Error),
}

impl SessionError {
    /// Static error code for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Read(_) => "read_error",
            Self::Write(_) => "write_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_write_error_becomes_fatal_handler_error() {
        let err: HandlerError = RenderError::Write(io::Error::from(io::ErrorKind::BrokenPipe)).into();
        assert!(err.is_fatal());
        assert_eq!(err.error_code(), "write_error");
    }

    #[test]
    fn render_generator_error_is_recoverable() {
        let err: HandlerError = RenderError::Generator {
            source: GeneratorError::Stream("reset by peer".into()),
            partial: "half an answ".into(),
        }
        .into();
        assert!(!err.is_fatal());
        assert_eq!(err.error_code(), "generator_error");
    }

    #[test]
    fn generator_error_display() {
        let err = GeneratorError::Status {
            status: 503,
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 503: overloaded");
        assert_eq!(err.error_code(), "status");
    }

    #[test]
    fn render_error_reports_partial_length() {
        let err = RenderError::Generator {
            source: GeneratorError::Decode("bad json".into()),
            partial: "abc".into(),
        };
        assert!(err.to_string().starts_with("generator failed after 3 bytes"));
    }
}
