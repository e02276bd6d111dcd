//! Command producer registry and dispatch.
//!
//! The `Registry` maps command names to producers, with an optional
//! fallback producer for lines no command claims. It is shared by every
//! session and stays mutable at runtime: lookups take the read lock just long
//! enough to clone the producer's `Arc`.

use super::context::Context;
use super::output::Output;
use super::traits::{Handler, Producer};
use crate::error::{HandlerError, HandlerResult};
use crate::telemetry::CommandTimer;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, debug, debug_span};

/// Metric and statistics label for lines handled by the fallback producer.
pub const FALLBACK_LABEL: &str = "else";

/// Handler built for one invocation.
pub struct Resolved<'n> {
    pub handler: Box<dyn Handler>,
    /// Command name, or [`FALLBACK_LABEL`] when the else producer answered.
    pub label: &'n str,
}

struct Entry {
    producer: Arc<dyn Producer>,
    calls: Arc<AtomicU64>,
}

/// Registry of command producers.
#[derive(Default)]
pub struct Registry {
    commands: RwLock<HashMap<String, Entry>>,
    fallback: RwLock<Option<Arc<dyn Producer>>>,
    fallback_calls: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `producer` under `name`, returning the producer it replaced.
    ///
    /// Names are matched case-sensitively. Usage counters survive
    /// re-registration.
    pub fn register(
        &self,
        name: impl Into<String>,
        producer: Arc<dyn Producer>,
    ) -> Option<Arc<dyn Producer>> {
        let name = name.into();
        let mut commands = self.commands.write();
        match commands.get_mut(&name) {
            Some(entry) => Some(std::mem::replace(&mut entry.producer, producer)),
            None => {
                commands.insert(
                    name,
                    Entry {
                        producer,
                        calls: Arc::new(AtomicU64::new(0)),
                    },
                );
                None
            }
        }
    }

    /// Register a plain function as a command. The returned text is written
    /// to the client with `\n` rewritten to `\r\n`.
    pub fn register_fn<F>(&self, name: impl Into<String>, f: F) -> Option<Arc<dyn Producer>>
    where
        F: Fn(&[String]) -> Result<String, HandlerError> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnProducer { f: Arc::new(f) }))
    }

    /// Set the producer used when no command name matches.
    pub fn register_else(&self, producer: Arc<dyn Producer>) -> Option<Arc<dyn Producer>> {
        self.fallback.write().replace(producer)
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.read().is_some()
    }

    /// Sorted list of registered command names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Build a handler for `name`, falling back to the else producer.
    ///
    /// The matching producer is cloned out of the lock and the call counted
    /// before it runs, so no guard is held while the handler is built. The
    /// label is the command name for registered commands and
    /// [`FALLBACK_LABEL`] otherwise, so arbitrary input never becomes a
    /// metric label.
    pub fn resolve<'n>(
        &self,
        ctx: &Context<'_>,
        name: &'n str,
        args: &[String],
    ) -> Option<Resolved<'n>> {
        let (producer, label) = self.lookup(name)?;
        Some(Resolved {
            handler: producer.produce(ctx, name, args),
            label,
        })
    }

    /// Resolve and run a command. Returns `None` when nothing handles `name`.
    pub async fn dispatch(
        &self,
        ctx: &mut Context<'_>,
        out: &mut Output<'_>,
        name: &str,
        args: &[String],
    ) -> Option<HandlerResult> {
        let Resolved { mut handler, label } = self.resolve(ctx, name, args)?;

        let span = debug_span!(
            "command",
            command = %label,
            session = %ctx.session_id,
            args = args.len(),
        );
        let _timer = CommandTimer::new(label);

        let result = handler.run(ctx, out).instrument(span).await;
        if let Err(ref e) = result {
            crate::metrics::record_command_error(label, e.error_code());
            debug!(command = %label, error = %e, "Command error");
        }
        Some(result)
    }

    /// Command usage statistics, most used first. Unused commands are omitted.
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<(String, u64)> = self
            .commands
            .read()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.calls.load(Ordering::Relaxed)))
            .collect();
        stats.push((
            FALLBACK_LABEL.to_string(),
            self.fallback_calls.load(Ordering::Relaxed),
        ));
        stats.retain(|(_, count)| *count > 0);
        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }

    fn lookup<'n>(&self, name: &'n str) -> Option<(Arc<dyn Producer>, &'n str)> {
        if let Some(entry) = self.commands.read().get(name) {
            entry.calls.fetch_add(1, Ordering::Relaxed);
            return Some((Arc::clone(&entry.producer), name));
        }
        let fallback = self.fallback.read().clone()?;
        self.fallback_calls.fetch_add(1, Ordering::Relaxed);
        Some((fallback, FALLBACK_LABEL))
    }
}

type CommandFn = dyn Fn(&[String]) -> Result<String, HandlerError> + Send + Sync;

struct FnProducer {
    f: Arc<CommandFn>,
}

impl Producer for FnProducer {
    fn produce(&self, _ctx: &Context<'_>, _name: &str, args: &[String]) -> Box<dyn Handler> {
        Box::new(FnHandler {
            f: Arc::clone(&self.f),
            args: args.to_vec(),
        })
    }
}

struct FnHandler {
    f: Arc<CommandFn>,
    args: Vec<String>,
}

#[async_trait]
impl Handler for FnHandler {
    async fn run(&mut self, _ctx: &mut Context<'_>, out: &mut Output<'_>) -> HandlerResult {
        let text = (self.f)(&self.args)?;
        out.write_text(&text).await?;
        Ok(())
    }
}
