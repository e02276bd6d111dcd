//! Property-based tests for the line editor.
//!
//! Verifies that for random input:
//! 1. Printable input is buffered and echoed byte for byte
//! 2. Erasing past the start of the line never panics or underflows
//! 3. Echo and buffer stay in sync under mixed editing

use bytes::BytesMut;
use proptest::prelude::*;
use telchat_proto::control::{BS, DEL, ERASE_SEQUENCE, ESC, LF};
use telchat_proto::{LineEditor, Step};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Bytes that are neither erase, escape, nor terminator. Restricted to ASCII
/// so every byte is exactly one visible character.
fn plain_byte() -> impl Strategy<Value = u8> {
    (0u8..0x80).prop_filter("no editing bytes", |b| {
        *b != BS && *b != DEL && *b != ESC && *b != LF
    })
}

fn plain_bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(plain_byte(), 0..max)
}

/// Random edit operations, including erases and escapes but no terminator.
fn edit_byte() -> impl Strategy<Value = u8> {
    prop_oneof![
        6 => plain_byte(),
        2 => Just(BS),
        1 => Just(DEL),
        1 => Just(ESC),
    ]
}

/// Replay the echo stream the way a dumb terminal would: printable bytes
/// occupy a cell, the erase sequence clears the last cell.
fn render(echo: &[u8]) -> Vec<u8> {
    let mut screen = Vec::new();
    let mut i = 0;
    while i < echo.len() {
        if echo[i..].starts_with(ERASE_SEQUENCE) {
            screen.pop();
            i += ERASE_SEQUENCE.len();
        } else {
            screen.push(echo[i]);
            i += 1;
        }
    }
    screen
}

proptest! {
    #[test]
    fn plain_input_is_buffered_and_echoed_verbatim(input in plain_bytes(256)) {
        let mut editor = LineEditor::new();
        let mut echo = BytesMut::new();
        for &b in &input {
            prop_assert_eq!(editor.consume(b, &mut echo), Step::Pending);
        }
        prop_assert_eq!(editor.buffer(), &input[..]);
        prop_assert_eq!(&echo[..], &input[..]);
        prop_assert_eq!(editor.visible(), input.len());
    }

    #[test]
    fn erasing_past_start_empties_buffer(input in plain_bytes(64), extra in 1usize..8) {
        let mut editor = LineEditor::new();
        let mut echo = BytesMut::new();
        for &b in &input {
            editor.consume(b, &mut echo);
        }
        for _ in 0..input.len() + extra {
            prop_assert_eq!(editor.consume(BS, &mut echo), Step::Pending);
        }
        prop_assert!(editor.buffer().is_empty());
        prop_assert_eq!(editor.visible(), 0);
    }

    #[test]
    fn echo_matches_buffer_under_editing(ops in prop::collection::vec(edit_byte(), 0..256)) {
        let mut editor = LineEditor::new();
        let mut echo = BytesMut::new();
        for &b in &ops {
            editor.consume(b, &mut echo);
        }
        prop_assert_eq!(render(&echo), editor.buffer().to_vec());
        prop_assert_eq!(editor.visible(), editor.buffer().len());
    }

    #[test]
    fn terminator_returns_everything_typed(input in plain_bytes(128)) {
        let mut editor = LineEditor::new();
        let mut echo = BytesMut::new();
        for &b in &input {
            editor.consume(b, &mut echo);
        }
        let step = editor.consume(LF, &mut echo);
        let mut expected = input.clone();
        expected.push(LF);
        if expected == b"\r\n" {
            prop_assert_eq!(step, Step::Blank);
        } else {
            prop_assert_eq!(step, Step::Line(String::from_utf8_lossy(&expected).into_owned()));
        }
        prop_assert!(editor.buffer().is_empty());
    }
}
