//! Session and command registry configuration.

use serde::Deserialize;
use std::time::Duration;

/// Parameters fixed for the lifetime of a session.
///
/// Banners are written verbatim, so they should carry their own `\r\n`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Prompt written before each line of input.
    #[serde(default)]
    pub prompt: String,
    /// Command that ends the session, matched ignoring ASCII case.
    #[serde(default = "default_exit_command")]
    pub exit_command: String,
    /// Banner written when the session starts.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    /// Banner written when the session ends.
    #[serde(default = "default_exit_message")]
    pub exit_message: String,
    /// Written when a response could not be generated.
    #[serde(default = "default_error_message")]
    pub error_message: String,
    /// Seconds without input before the session is closed (0 disables).
    #[serde(default)]
    pub idle_timeout_secs: u64,
    /// Maximum bytes held in the line buffer.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Prompts exchanged with the generator before the first prompt is shown.
    #[serde(default)]
    pub intro: Vec<String>,
}

impl SessionConfig {
    /// Idle timeout, if enabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            exit_command: default_exit_command(),
            welcome_message: default_welcome_message(),
            exit_message: default_exit_message(),
            error_message: default_error_message(),
            idle_timeout_secs: 0,
            max_line_len: default_max_line_len(),
            intro: Vec::new(),
        }
    }
}

fn default_exit_command() -> String {
    "bye".to_string()
}

fn default_welcome_message() -> String {
    "\r\nWelcome!\r\n".to_string()
}

fn default_exit_message() -> String {
    "\r\nGoodbye!\r\n".to_string()
}

fn default_error_message() -> String {
    "\r\n*** no response ***\r\n\r\n".to_string()
}

fn default_max_line_len() -> usize {
    telchat_proto::DEFAULT_MAX_LINE_LEN
}

/// Command registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandsConfig {
    /// Register the built-in commands (`help`, `echo`, `clear`, `reset`,
    /// `history`). When off, every line goes to the generator.
    #[serde(default)]
    pub builtins: bool,
}
