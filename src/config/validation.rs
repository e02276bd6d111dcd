//! Configuration validation.
//!
//! Validates configuration at startup so no session is ever started with
//! settings it cannot honour.

use super::{Backend, Config};
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("session.exit_command is required")]
    MissingExitCommand,
    #[error("session.exit_command must be a single word, got '{0}'")]
    ExitCommandHasWhitespace(String),
    #[error("session.max_line_len must be at least 1")]
    ZeroMaxLineLen,
    #[error("session.intro[{0}] is empty")]
    EmptyIntroPrompt(usize),
    #[error("generator.model is required for the openai backend")]
    MissingModel,
    #[error("generator.base_url must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
    #[error("generator.seed_messages[{0}] has empty content")]
    EmptySeedMessage(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let exit = &config.session.exit_command;
    if exit.is_empty() {
        errors.push(ValidationError::MissingExitCommand);
    } else if exit.split_whitespace().count() != 1 || exit.trim() != exit {
        errors.push(ValidationError::ExitCommandHasWhitespace(exit.clone()));
    }

    if config.session.max_line_len == 0 {
        errors.push(ValidationError::ZeroMaxLineLen);
    }

    for (i, prompt) in config.session.intro.iter().enumerate() {
        if prompt.trim().is_empty() {
            errors.push(ValidationError::EmptyIntroPrompt(i));
        }
    }

    let generator = &config.generator;
    if generator.backend == Backend::OpenAi {
        if generator.model.trim().is_empty() {
            errors.push(ValidationError::MissingModel);
        }
        let url = &generator.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError::InvalidBaseUrl(url.clone()));
        }
    }

    for (i, msg) in generator.seed_messages.iter().enumerate() {
        if msg.content.is_empty() {
            errors.push(ValidationError::EmptySeedMessage(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
