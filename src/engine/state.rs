// src/engine/state.rs
//! Tunnel run state and configuration snapshot
//!
//! One mutex guards the run-time marker and the VPN options; start, stop,
//! and status queries all serialize on it. Guards are RAII so the lock is
//! released on every exit path.

use crate::utils::errors::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Access-control mode for the package filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AccessControlMode {
    /// Only the listed packages use the tunnel
    #[default]
    AcceptSelected,

    /// All packages except the listed ones use the tunnel
    RejectSelected,
}

/// Per-package access control list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessControl {
    pub mode: AccessControlMode,
    pub packages: Vec<String>,
}

/// Snapshot of the proxy/VPN configuration exposed to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VpnOptions {
    pub enable: bool,
    pub port: u16,
    pub ipv4_address: String,
    pub ipv6_address: Option<String>,
    pub access_control: Option<AccessControl>,
    pub system_proxy: bool,
    pub allow_bypass: bool,
    pub route_address: Vec<String>,
    pub bypass_domain: Vec<String>,
    pub dns_server_address: String,
}

#[derive(Debug, Default)]
struct StateInner {
    started_at: Option<DateTime<Utc>>,
    options: VpnOptions,
}

/// Mutex-guarded tunnel lifecycle state
#[derive(Debug, Default)]
pub struct TunnelState {
    inner: Mutex<StateInner>,
}

impl TunnelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tunnel as started; returns the start time in epoch millis
    pub fn mark_started(&self) -> i64 {
        let now = Utc::now();
        self.inner.lock().started_at = Some(now);
        now.timestamp_millis()
    }

    /// Record the tunnel as stopped
    pub fn mark_stopped(&self) {
        self.inner.lock().started_at = None;
    }

    /// Start time in epoch millis, or `None` when stopped
    pub fn run_time(&self) -> Option<i64> {
        self.inner.lock().started_at.map(|t| t.timestamp_millis())
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().started_at.is_some()
    }

    /// Replace the current options
    pub fn set_options(&self, options: VpnOptions) {
        self.inner.lock().options = options;
    }

    /// Apply an encoded options update from the host.
    ///
    /// Malformed JSON leaves the current state unchanged.
    pub fn apply_state_json(&self, payload: &str) {
        match serde_json::from_str::<VpnOptions>(payload) {
            Ok(options) => self.inner.lock().options = options,
            Err(e) => debug!(error = %e, "dropping malformed state update"),
        }
    }

    /// Serialized snapshot of the current options (status query)
    pub fn options_json(&self) -> Result<String> {
        let inner = self.inner.lock();
        Ok(serde_json::to_string(&inner.options)?)
    }
}
