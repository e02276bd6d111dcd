//! Built-in utility commands.

use super::core::{Context, Handler, Output, Producer, Registry};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use std::sync::Arc;

/// ANSI erase-display followed by cursor-home.
const CLEAR_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

/// Register `help`, `echo`, `clear`, `reset`, `history` and `stats`.
pub fn register_builtins(registry: &Registry) {
    registry.register("help", Arc::new(HelpHandler));
    registry.register("clear", Arc::new(ClearHandler));
    registry.register("reset", Arc::new(ResetHandler));
    registry.register("history", Arc::new(HistoryHandler));
    registry.register("stats", Arc::new(StatsHandler));
    registry.register_fn("echo", |args| {
        if args.is_empty() {
            return Err(HandlerError::NeedMoreParams("echo".into()));
        }
        Ok(format!("{}\n", args.join(" ")))
    });
}

/// Stateless handlers are their own producers.
macro_rules! unit_producer {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Producer for $ty {
                fn produce(&self, _ctx: &Context<'_>, _name: &str, _args: &[String]) -> Box<dyn Handler> {
                    Box::new($ty)
                }
            }
        )*
    };
}

unit_producer!(HelpHandler, ClearHandler, ResetHandler, HistoryHandler, StatsHandler);

/// Lists registered commands.
pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn run(&mut self, ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult {
        let mut text = format!("Commands: {}\n", ctx.registry.names().join(", "));
        if ctx.registry.has_fallback() {
            text.push_str("Anything else is sent to the chat.\n");
        }
        out.write_text(&text).await?;
        Ok(())
    }
}

pub struct ClearHandler;

#[async_trait]
impl Handler for ClearHandler {
    async fn run(&mut self, _ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult {
        out.write_raw(CLEAR_SCREEN).await?;
        Ok(())
    }
}

/// Drops the conversation back to its seed.
pub struct ResetHandler;

#[async_trait]
impl Handler for ResetHandler {
    async fn run(&mut self, ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult {
        ctx.conversation.reset();
        out.write_text("Conversation reset.\n").await?;
        Ok(())
    }
}

pub struct HistoryHandler;

#[async_trait]
impl Handler for HistoryHandler {
    async fn run(&mut self, ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult {
        let text = format!(
            "{} messages in history ({} total with seed).\n",
            ctx.conversation.history_len(),
            ctx.conversation.len()
        );
        out.write_text(&text).await?;
        Ok(())
    }
}

/// Per-command usage counts since startup, shared by all sessions.
pub struct StatsHandler;

#[async_trait]
impl Handler for StatsHandler {
    async fn run(&mut self, ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult {
        let mut text = String::from("Command usage:\n");
        for (name, count) in ctx.registry.command_stats() {
            text.push_str(&format!("  {name:<12} {count}\n"));
        }
        out.write_text(&text).await?;
        Ok(())
    }
}
