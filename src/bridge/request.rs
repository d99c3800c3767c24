// src/bridge/request.rs
//! The bridge request pattern
//!
//! Turns an asynchronous host-side answer into a synchronous-looking
//! result for the calling task: allocate a correlation ID, hand it to the
//! host through a non-blocking notify callback, then poll the result
//! registry until the answer lands or the channel's deadline elapses.
//!
//! Polling with a fixed short interval is deliberate: the host delivery
//! path and the engine do not share a wake primitive across the runtime
//! boundary, so the loop trades bounded tail latency (at most one poll
//! interval) for boundary simplicity. The poll loop is the only
//! suspension point; the notify hand-off never blocks on the host.

use crate::bridge::correlation::{CorrelationId, IdGenerator};
use crate::bridge::registry::ResultRegistry;
use metrics::counter;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::trace;

/// Metric: requests that reached their deadline without a delivery
pub const REQUEST_TIMEOUTS: &str = "tunbridge_request_timeouts_total";

/// Timing for one bridge channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Wall-clock budget measured from request issuance
    pub deadline: Duration,

    /// Sleep between registry polls; must stay small relative to the deadline
    pub poll_interval: Duration,
}

impl BridgeConfig {
    /// Create a config with the reference 20ms poll interval
    pub const fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            poll_interval: Duration::from_millis(20),
        }
    }

    /// Override the poll interval
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Outcome of a bridge request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOutcome<T> {
    /// The host delivered a result before the deadline
    Delivered(T),

    /// The deadline elapsed with no delivery; the caller applies its own
    /// fail-open or fail-closed policy
    TimedOut,
}

impl<T> BridgeOutcome<T> {
    /// Whether the deadline elapsed without a delivery
    pub fn is_timed_out(&self) -> bool {
        matches!(self, BridgeOutcome::TimedOut)
    }
}

/// One bridge channel: an ID generator plus a result registry with fixed timing
///
/// Channels are explicit instances injected into their hooks, so several
/// independent bridges can coexist in one process.
pub struct Bridge<T> {
    ids: IdGenerator,
    registry: ResultRegistry<T>,
    config: BridgeConfig,
    channel: &'static str,
}

impl<T: Clone> Bridge<T> {
    /// Create a channel with its own generator and registry
    pub fn new(channel: &'static str, config: BridgeConfig) -> Self {
        Self {
            ids: IdGenerator::new(),
            registry: ResultRegistry::new(channel),
            config,
            channel,
        }
    }

    /// Issue a request and await its answer.
    ///
    /// `notify` delivers `(id, payload)` to the host and must not block on
    /// the host's processing; it only hands the request off. The poll loop
    /// then runs until the registry holds an entry for the ID or the
    /// deadline passes. There is no external cancel: once issued, a
    /// request runs to completion or timeout.
    pub async fn request<P>(
        &self,
        payload: P,
        notify: impl FnOnce(CorrelationId, P),
    ) -> BridgeOutcome<T> {
        let id = self.ids.next_id();
        notify(id, payload);

        let deadline = Instant::now() + self.config.deadline;
        loop {
            if Instant::now() >= deadline {
                counter!(REQUEST_TIMEOUTS, "channel" => self.channel).increment(1);
                trace!(channel = self.channel, %id, "bridge request timed out");
                return BridgeOutcome::TimedOut;
            }
            if let Some(value) = self.registry.try_get(id) {
                trace!(channel = self.channel, %id, "bridge request delivered");
                return BridgeOutcome::Delivered(value);
            }
            sleep(self.config.poll_interval).await;
        }
    }

    /// External delivery entry point.
    ///
    /// Safe for late, duplicate, or unsolicited IDs: the write lands in
    /// the registry and is simply never read if no request is polling.
    pub fn deliver(&self, id: CorrelationId, value: T) {
        self.registry.put(id, value);
    }

    /// The channel's result registry
    pub fn registry(&self) -> &ResultRegistry<T> {
        &self.registry
    }

    /// The channel's timing configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}
