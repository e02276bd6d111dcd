//! Control bytes recognised by the line editor.

/// Bell. Echoed when input is dropped because the line is full.
pub const BEL: u8 = 0x07;

/// Backspace, the primary erase byte.
pub const BS: u8 = 0x08;

/// Line feed. Completes the pending line.
pub const LF: u8 = 0x0A;

/// Carriage return.
pub const CR: u8 = 0x0D;

/// Escape. Swallowed without echo.
pub const ESC: u8 = 0x1B;

/// Delete. Many terminals send this instead of BS for the backspace key.
pub const DEL: u8 = 0x7F;

/// Visual erase of one cell: move left, blank it, move left again.
pub const ERASE_SEQUENCE: &[u8] = b"\x08 \x08";

/// Line ending the session transport expects.
pub const CRLF: &str = "\r\n";

/// Returns `true` for bytes that erase the previous character.
#[inline]
pub fn is_erase(b: u8) -> bool {
    b == BS || b == DEL
}

/// Returns `true` for UTF-8 continuation bytes (`10xxxxxx`).
#[inline]
pub(crate) fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}
