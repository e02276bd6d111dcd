//! Core handler infrastructure.
//!
//! A line's first token is resolved through the [`Registry`] to a
//! [`Producer`], which builds a one-shot [`Handler`] for that invocation.
//! Handlers write to the client through [`Output`].

pub mod context;
pub mod output;
pub mod registry;
pub mod traits;

pub use context::Context;
pub use output::Output;
pub use registry::Registry;
pub use traits::{Handler, Producer};
