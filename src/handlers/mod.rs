//! Command handlers.
//!
//! - [`chat`]: fallback that streams a generated reply for any line
//! - [`builtin`]: small utility commands (`help`, `echo`, `clear`, `reset`, `history`, `stats`)

pub mod builtin;
pub mod chat;
pub mod core;

pub use core::{Context, Output, Registry};

/// Build the registry every session shares.
pub fn build_registry(builtins: bool) -> Registry {
    let registry = Registry::new();
    if builtins {
        builtin::register_builtins(&registry);
    }
    registry.register_else(std::sync::Arc::new(chat::ChatProducer));
    registry
}
