//! Producer and handler traits.

use super::context::Context;
use super::output::Output;
use crate::error::HandlerResult;
use async_trait::async_trait;

/// One-shot unit of work bound to a single invocation.
///
/// Handlers own whatever they took from the invocation, so the registry lock
/// is never held while one runs.
#[async_trait]
pub trait Handler: Send {
    /// Execute the command, writing any output through `out`.
    async fn run(&mut self, ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult;
}

/// Factory that builds a [`Handler`] for an invocation.
///
/// Producers are shared across sessions and must not hold per-invocation
/// state.
pub trait Producer: Send + Sync {
    /// Build the handler for one invocation of `name` with `args`, the
    /// tokens after the command name.
    fn produce(&self, ctx: &Context<'_>, name: &str, args: &[String]) -> Box<dyn Handler>;
}
