//! Character-level line editor.
//!
//! [`LineEditor`] is a small finite-state machine fed one byte at a time. It
//! owns the pending line buffer and writes the bytes the client should see
//! (echo, erase sequences) into a caller-supplied [`BytesMut`], so the
//! transport decides when to flush.
//!
//! ```text
//!            byte
//!   ┌──────────────────┐
//!   │                  ▼
//!   │   ┌──────────────────────┐   finish()   ┌──────┐
//!   └───│        Normal        │ ───────────▶ │ Done │
//!       └──────────────────────┘              └──────┘
//!         │ LF          │ BS/DEL, ESC, other
//!         ▼             ▼
//!   Line / Blank      Pending
//! ```
//!
//! ## Known limitation
//!
//! ESC is swallowed on its own. The remaining bytes of a multi-byte escape
//! sequence (`ESC [ A` for an arrow key) are treated as ordinary input and
//! echoed.

use bytes::BytesMut;

use crate::control::{BEL, ERASE_SEQUENCE, ESC, LF, is_continuation, is_erase};

/// Default cap on the pending line buffer, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// The exact completed line treated as an empty submission.
const BLANK_LINE: &[u8] = b"\r\n";

/// Result of consuming one byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The line is still being edited.
    Pending,
    /// The completed line was exactly `"\r\n"`.
    Blank,
    /// A completed line, terminator included.
    Line(String),
    /// The editor has been finished; input is ignored.
    Terminated,
}

/// Editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Accepting input.
    Normal,
    /// The transport is gone; no further input is processed.
    Done,
}

/// Per-connection line editor.
#[derive(Debug)]
pub struct LineEditor {
    state: EditorState,
    buffer: Vec<u8>,
    /// Characters currently rendered on the client for this line.
    visible: usize,
    max_len: usize,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    /// Create an editor with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create an editor that holds at most `max_len` bytes per line.
    ///
    /// A `max_len` of zero is raised to one so the terminator always fits.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            state: EditorState::Normal,
            buffer: Vec::with_capacity(128),
            visible: 0,
            max_len: max_len.max(1),
        }
    }

    /// Current state.
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Pending (not yet submitted) bytes.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of characters currently echoed for the pending line.
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Discard the pending line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.visible = 0;
    }

    /// Stop accepting input. Every later [`consume`](Self::consume) returns
    /// [`Step::Terminated`].
    pub fn finish(&mut self) {
        self.state = EditorState::Done;
        self.reset();
    }

    /// Feed one byte. Bytes the client should see are appended to `echo`.
    pub fn consume(&mut self, byte: u8, echo: &mut BytesMut) -> Step {
        if self.state == EditorState::Done {
            return Step::Terminated;
        }

        match byte {
            ESC => Step::Pending,
            b if is_erase(b) => {
                self.erase(echo);
                Step::Pending
            }
            LF => {
                // The terminator is always accepted, even on a full line.
                self.push(byte, echo);
                self.complete()
            }
            _ => {
                if self.buffer.len() >= self.max_len {
                    echo.extend_from_slice(&[BEL]);
                } else {
                    self.push(byte, echo);
                }
                Step::Pending
            }
        }
    }

    fn push(&mut self, byte: u8, echo: &mut BytesMut) {
        self.buffer.push(byte);
        echo.extend_from_slice(&[byte]);
        if !is_continuation(byte) {
            self.visible += 1;
        }
    }

    fn erase(&mut self, echo: &mut BytesMut) {
        if self.visible == 0 {
            return;
        }
        // Drop the whole character, continuation bytes first.
        while let Some(b) = self.buffer.pop() {
            if !is_continuation(b) {
                break;
            }
        }
        self.visible -= 1;
        echo.extend_from_slice(ERASE_SEQUENCE);
    }

    fn complete(&mut self) -> Step {
        let step = if self.buffer == BLANK_LINE {
            Step::Blank
        } else {
            Step::Line(String::from_utf8_lossy(&self.buffer).into_owned())
        };
        self.reset();
        step
    }
}
