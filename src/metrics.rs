//! Prometheus metrics collection for telchatd.
//!
//! - `telchat_sessions_active` / `telchat_sessions_total` - connection lifecycle
//! - `telchat_lines_total` - completed non-blank input lines
//! - `telchat_command_total{command}` - dispatches by command
//! - `telchat_command_duration_seconds{command}` - dispatch latency histogram
//! - `telchat_command_errors_total{command,error}` - failed dispatches
//! - `telchat_fragments_total` - response fragments streamed to clients
//! - `telchat_generator_errors_total{error}` - generator failures

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Sessions
// ========================================================================

/// Currently open sessions.
pub static SESSIONS_ACTIVE: OnceLock<IntGauge> = OnceLock::new();

/// Sessions accepted since startup.
pub static SESSIONS_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Completed, non-blank input lines.
pub static LINES_TOTAL: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Dispatch
// ========================================================================

/// Dispatches by command label.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Dispatch latency by command label. Chat exchanges dominate the upper buckets.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Handler errors by command and error code.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Streaming
// ========================================================================

pub static FRAGMENTS_TOTAL: OnceLock<IntCounter> = OnceLock::new();

pub static GENERATOR_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
/// Recording before `init()` is a silent no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(SESSIONS_ACTIVE, IntGauge::new("telchat_sessions_active", "Currently open sessions"));
    register!(SESSIONS_TOTAL, IntCounter::new("telchat_sessions_total", "Sessions accepted"));
    register!(LINES_TOTAL, IntCounter::new("telchat_lines_total", "Completed non-blank input lines"));

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("telchat_command_total", "Dispatches by command"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("telchat_command_duration_seconds", "Dispatch latency by command")
            .buckets(vec![0.0001, 0.001, 0.01, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("telchat_command_errors_total", "Handler errors by command"), &["command", "error"]));

    register!(FRAGMENTS_TOTAL, IntCounter::new("telchat_fragments_total", "Response fragments streamed"));
    register!(GENERATOR_ERRORS, IntCounterVec::new(Opts::new("telchat_generator_errors_total", "Generator failures"), &["error"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

#[inline]
pub fn session_opened() {
    if let Some(c) = SESSIONS_TOTAL.get() {
        c.inc();
    }
    if let Some(g) = SESSIONS_ACTIVE.get() {
        g.inc();
    }
}

#[inline]
pub fn session_closed() {
    if let Some(g) = SESSIONS_ACTIVE.get() {
        g.dec();
    }
}

#[inline]
pub fn record_line() {
    if let Some(c) = LINES_TOTAL.get() {
        c.inc();
    }
}

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

#[inline]
pub fn record_fragment() {
    if let Some(c) = FRAGMENTS_TOTAL.get() {
        c.inc();
    }
}

#[inline]
pub fn record_generator_error(error: &str) {
    if let Some(c) = GENERATOR_ERRORS.get() {
        c.with_label_values(&[error]).inc();
    }
}
