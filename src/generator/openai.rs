//! OpenAI-compatible chat completion backend.
//!
//! Posts the conversation to `{base_url}/chat/completions` with
//! `stream: true` and yields each `choices[0].delta.content` as a fragment.
//! The body is server-sent events terminated by a `[DONE]` data line.

use super::{ChatMessage, FragmentStream, ResponseGenerator};
use crate::config::GeneratorConfig;
use crate::error::GeneratorError;
use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Data payload that ends a completion stream.
const DONE: &str = "[DONE]";

pub struct OpenAiGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    seed: Option<i64>,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChunkResponse {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        let api_key = match &config.api_key_env {
            Some(var) => match std::env::var(var) {
                Ok(key) => Some(key),
                Err(_) => {
                    warn!(var = %var, "API key variable not set, sending unauthenticated requests");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            seed: config.seed,
            temperature: config.temperature,
        })
    }
}

impl ResponseGenerator for OpenAiGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn stream(&self, messages: Vec<ChatMessage>) -> FragmentStream {
        let mut request = self.client.post(&self.url).json(&ChatRequest {
            model: self.model.clone(),
            messages,
            stream: true,
            seed: self.seed,
            temperature: self.temperature,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        Box::pin(completion_stream(request))
    }
}

fn completion_stream(
    request: reqwest::RequestBuilder,
) -> impl Stream<Item = Result<String, GeneratorError>> + Send + 'static {
    async_stream::try_stream! {
        let response = send(request).await?;
        let mut fragments = std::pin::pin!(content_fragments(response.bytes_stream()));
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            yield fragment;
        }
    }
}

/// Decode an SSE body into content fragments, stopping at `[DONE]`.
fn content_fragments<S, B, E>(
    body: S,
) -> impl Stream<Item = Result<String, GeneratorError>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<GeneratorError> + fmt::Display + Send + 'static,
{
    async_stream::try_stream! {
        let mut events = std::pin::pin!(body.eventsource());
        while let Some(event) = events.next().await {
            let event = event.map_err(stream_error)?;
            trace!(data = %event.data, "completion event");
            if event.data == DONE {
                break;
            }
            if event.data.trim().is_empty() {
                continue;
            }
            if let Some(content) = parse_chunk(&event.data)? {
                yield content;
            }
        }
    }
}

fn stream_error<E>(err: EventStreamError<E>) -> GeneratorError
where
    E: Into<GeneratorError> + fmt::Display,
{
    match err {
        EventStreamError::Transport(e) => e.into(),
        other => GeneratorError::Decode(other.to_string()),
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, GeneratorError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GeneratorError::Status {
            status: status.as_u16(),
            body,
        });
    }
    debug!(status = status.as_u16(), "completion stream opened");
    Ok(response)
}

/// Extract the content delta from one stream chunk. Chunks without content
/// (role announcements, finish markers) yield `None`.
fn parse_chunk(data: &str) -> Result<Option<String>, GeneratorError> {
    let chunk: ChunkResponse =
        serde_json::from_str(data).map_err(|e| GeneratorError::Decode(e.to_string()))?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|c| !c.is_empty()))
}
