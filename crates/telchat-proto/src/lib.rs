//! # telchat-proto
//!
//! Sans-IO building blocks for interactive line-oriented terminal sessions.
//!
//! Nothing in this crate touches a socket. Callers feed raw bytes in and get
//! echo bytes and completed lines back, which keeps the state machines easy
//! to drive from a tokio task, a test harness, or a benchmark alike.
//!
//! ## Quick Start
//!
//! ```rust
//! use bytes::BytesMut;
//! use telchat_proto::{LineEditor, Step};
//!
//! let mut editor = LineEditor::new();
//! let mut echo = BytesMut::new();
//!
//! let mut last = Step::Pending;
//! for &b in b"hi\x08ello\r\n" {
//!     last = editor.consume(b, &mut echo);
//! }
//!
//! assert_eq!(last, Step::Line("hello\r\n".to_string()));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod control;
pub mod crlf;
pub mod line;
pub mod tokens;

pub use self::crlf::{CrlfTranslator, to_crlf};
pub use self::line::{DEFAULT_MAX_LINE_LEN, EditorState, LineEditor, Step};
pub use self::tokens::{eq_command, tokenize};
