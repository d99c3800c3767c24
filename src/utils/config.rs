// src/utils/config.rs
//! Engine configuration
//!
//! Loads settings from an optional `tunbridge` config file layered under
//! `TUNBRIDGE_*` environment variables. Each bridge channel keeps its own
//! deadline and poll interval; the defaults preserve the asymmetry the
//! engine ships with (socket marking fails open after 500ms, package
//! resolution fails closed after 200ms, both polling every 20ms).

use crate::bridge::request::BridgeConfig;
use crate::utils::errors::{EngineError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Top-level engine configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Bridge channel timing
    pub bridge: BridgeSettings,
}

/// Timing settings for the two bridge channels
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Socket-mark deadline in milliseconds (fail-open channel)
    pub mark_deadline_ms: u64,

    /// Package-resolution deadline in milliseconds (fail-closed channel)
    pub resolve_deadline_ms: u64,

    /// Registry poll interval in milliseconds, shared by both channels
    pub poll_interval_ms: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            mark_deadline_ms: 500,
            resolve_deadline_ms: 200,
            poll_interval_ms: 20,
        }
    }
}

impl BridgeSettings {
    /// Bridge configuration for the socket-mark channel
    pub fn mark_config(&self) -> BridgeConfig {
        BridgeConfig::new(Duration::from_millis(self.mark_deadline_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    /// Bridge configuration for the package-resolution channel
    pub fn resolve_config(&self) -> BridgeConfig {
        BridgeConfig::new(Duration::from_millis(self.resolve_deadline_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }
}

impl EngineConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("tunbridge").required(false))
            .add_source(config::Environment::with_prefix("TUNBRIDGE").separator("__"))
            .build()
            .map_err(|e| EngineError::ConfigError(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| EngineError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_channel_asymmetry() {
        let settings = BridgeSettings::default();
        assert_eq!(settings.mark_deadline_ms, 500);
        assert_eq!(settings.resolve_deadline_ms, 200);
        assert_eq!(settings.poll_interval_ms, 20);
    }

    #[test]
    fn test_channel_configs() {
        let settings = BridgeSettings::default();

        let mark = settings.mark_config();
        assert_eq!(mark.deadline, Duration::from_millis(500));
        assert_eq!(mark.poll_interval, Duration::from_millis(20));

        let resolve = settings.resolve_config();
        assert_eq!(resolve.deadline, Duration::from_millis(200));
        assert_eq!(resolve.poll_interval, Duration::from_millis(20));
    }

    #[test]
    fn test_poll_interval_small_relative_to_deadlines() {
        // The poll interval bounds wasted tail latency; it must stay a
        // small fraction of both deadlines.
        let settings = BridgeSettings::default();
        assert!(settings.poll_interval_ms * 5 <= settings.resolve_deadline_ms);
        assert!(settings.poll_interval_ms * 5 <= settings.mark_deadline_ms);
    }
}
