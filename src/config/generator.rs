//! Response generator configuration.

use serde::Deserialize;
use std::time::Duration;

use crate::generator::Role;

/// Which generator backs the `chat` fallback.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// OpenAI-compatible `/chat/completions` endpoint with SSE streaming.
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Offline backend that streams the user's words back.
    Echo,
}

/// A message placed in every new conversation after the system prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedMessage {
    pub role: Role,
    pub content: String,
}

/// Response generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: Option<String>,
    pub seed: Option<i64>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub seed_messages: Vec<SeedMessage>,
    /// Exchanges kept in the conversation beyond the seed (0 = unbounded).
    #[serde(default)]
    pub max_history: usize,
    /// Delay between echo backend fragments, in milliseconds.
    #[serde(default)]
    pub fragment_delay_ms: u64,
    /// TCP connect timeout towards the backend, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl GeneratorConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn fragment_delay(&self) -> Duration {
        Duration::from_millis(self.fragment_delay_ms)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: None,
            seed: None,
            temperature: None,
            system_prompt: None,
            seed_messages: Vec::new(),
            max_history: 0,
            fragment_delay_ms: 0,
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}
