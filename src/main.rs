//! telchatd - interactive line-oriented terminal chat server.
//!
//! Accepts raw TCP connections, edits input a character at a time, and
//! streams generated replies back as they are produced.

mod config;
mod error;
mod generator;
mod handlers;
mod http;
mod metrics;
mod network;
mod render;
mod telemetry;

use crate::config::Config;
use crate::generator::Conversation;
use crate::network::{Gateway, Shared};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if std::env::var("TELCHATD_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        backend = ?config.generator.backend,
        "Starting telchatd"
    );

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port.unwrap_or(9090);
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        metrics::init();
        info!("Metrics initialized");

        tokio::spawn(async move {
            http::run_http_server(metrics_port).await;
        });
        info!(port = metrics_port, "Prometheus HTTP server started");
    }

    let generator = generator::build(&config.generator)?;
    info!(generator = generator.name(), model = %config.generator.model, "Response generator ready");

    let registry = Arc::new(handlers::build_registry(config.commands.builtins));
    info!(commands = ?registry.names(), "Command registry built");

    let shared = Shared {
        config: Arc::new(config.session),
        registry,
        generator,
        seed: Arc::new(Conversation::from_config(&config.generator)),
    };

    let gateway = Gateway::bind(&config.listen, shared).await?;
    gateway.run().await?;

    Ok(())
}
