//! Newline translation for CRLF-framed terminals.
//!
//! Streamed text arrives in arbitrary fragments, so a `\r\n` pair can be
//! split across two of them. [`CrlfTranslator`] remembers whether the last
//! fragment ended in `\r` and only rewrites bare `\n`.

use std::borrow::Cow;

/// Stateful `\n` → `\r\n` rewriter.
#[derive(Debug, Default, Clone)]
pub struct CrlfTranslator {
    last_was_cr: bool,
}

impl CrlfTranslator {
    /// Create a translator with no carried state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any `\r` carried over from the previous fragment.
    pub fn reset(&mut self) {
        self.last_was_cr = false;
    }

    /// Rewrite bare `\n` in `fragment` to `\r\n`.
    ///
    /// Borrows the input when nothing needs rewriting.
    pub fn translate<'a>(&mut self, fragment: &'a str) -> Cow<'a, str> {
        if fragment.is_empty() {
            return Cow::Borrowed(fragment);
        }

        if !fragment.contains('\n') {
            self.last_was_cr = fragment.ends_with('\r');
            return Cow::Borrowed(fragment);
        }

        let mut out = String::with_capacity(fragment.len() + 8);
        let mut prev_cr = self.last_was_cr;
        for ch in fragment.chars() {
            if ch == '\n' && !prev_cr {
                out.push('\r');
            }
            out.push(ch);
            prev_cr = ch == '\r';
        }
        self.last_was_cr = prev_cr;
        Cow::Owned(out)
    }
}

/// One-shot translation of a complete string.
pub fn to_crlf(text: &str) -> Cow<'_, str> {
    CrlfTranslator::new().translate(text)
}
