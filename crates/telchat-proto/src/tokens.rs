//! Line tokenization.

/// Split a completed line into whitespace-separated tokens.
///
/// The terminator and any surrounding whitespace never produce tokens, so a
/// line made only of whitespace yields an empty vector.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Compare a token against a command name, ignoring ASCII case.
#[inline]
pub fn eq_command(token: &str, command: &str) -> bool {
    token.eq_ignore_ascii_case(command)
}
