//! Network layer: TCP listener and per-connection sessions.

pub mod connection;
pub mod gateway;

pub use connection::{Session, Shared};
pub use gateway::Gateway;
