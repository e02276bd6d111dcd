//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Top-level config struct, server identity, loading
//! - [`listen`]: Network listener configuration
//! - [`session`]: Per-session banners, prompt, exit keyword, built-in commands
//! - [`generator`]: Response generator backend selection and conversation seed
//! - [`validation`]: Startup checks that reject unusable configurations

mod generator;
mod listen;
mod session;
mod types;
pub mod validation;

pub use generator::{Backend, GeneratorConfig, SeedMessage};
pub use listen::ListenConfig;
pub use session::{CommandsConfig, SessionConfig};
pub use types::{Config, ConfigError, ServerConfig};
