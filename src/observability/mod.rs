// src/observability/mod.rs
//! Tracing and metrics initialization
//!
//! Embedders call `init_tracing` and `init_metrics` once at startup. Both
//! are idempotent-friendly: a second call reports an error instead of
//! panicking, so library tests and multi-init hosts stay safe.

use crate::utils::errors::{EngineError, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static PROMETHEUS: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info` when unset.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| EngineError::ConfigError(format!("tracing init failed: {}", e)))
}

/// Install the Prometheus metrics recorder.
pub fn init_metrics() -> Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| EngineError::ConfigError(format!("metrics init failed: {}", e)))?;

    PROMETHEUS
        .set(handle)
        .map_err(|_| EngineError::ConfigError("metrics recorder already installed".to_string()))
}

/// Render the current metrics in Prometheus exposition format.
///
/// Returns `None` before `init_metrics` has run.
pub fn metrics_snapshot() -> Option<String> {
    PROMETHEUS.get().map(|handle| handle.render())
}
