// src/engine/socket_gate.rs
//! Socket gate: the hook on the engine's socket-creation path
//!
//! Runs synchronously between socket creation and connect. The host must
//! mark the socket (apply its system-level attribute) before the
//! connection proceeds, so the gate issues a bridge request carrying the
//! raw descriptor and waits for the mark to be acknowledged.
//!
//! Two policies shape the gate:
//!
//! - A host policy check runs first; a blocked connection fails fast with
//!   no correlation ID consumed and no notify sent.
//! - Timeouts fail open: a stalled or absent host must degrade marking,
//!   not take the whole tunnel down.

use crate::bridge::correlation::CorrelationId;
use crate::bridge::request::{Bridge, BridgeConfig, BridgeOutcome};
use crate::engine::metadata::NetworkType;
use crate::utils::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Wire shape of a mark notification and its delivery
///
/// `value` is the raw descriptor. On delivery it is part of the wire
/// shape but unused; the registry entry's existence is the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketMark {
    pub id: CorrelationId,
    pub value: i64,
}

/// One-way, non-blocking hand-off of a mark request to the host
pub type MarkNotifier = Arc<dyn Fn(SocketMark) + Send + Sync>;

/// Host policy consulted before any bridge interaction
pub trait ConnectionPolicy: Send + Sync {
    /// Whether this connection must be refused outright
    fn should_block(&self, network: NetworkType, address: &str) -> bool;
}

impl<F> ConnectionPolicy for F
where
    F: Fn(NetworkType, &str) -> bool + Send + Sync,
{
    fn should_block(&self, network: NetworkType, address: &str) -> bool {
        self(network, address)
    }
}

/// Raw socket handle as seen by the gate
///
/// The gate needs exclusive access to the descriptor while the host
/// applies the mark, mirroring the engine's scoped handle-access window;
/// callers express that window by handing the gate a `&mut` borrow.
#[derive(Debug)]
pub struct SocketHandle {
    fd: i64,
}

impl SocketHandle {
    pub fn new(fd: i64) -> Self {
        Self { fd }
    }

    /// The raw descriptor value forwarded to the host
    pub fn fd(&self) -> i64 {
        self.fd
    }
}

/// Hook installed into the engine's socket-creation path
pub struct SocketGate {
    bridge: Bridge<()>,
    policy: Arc<dyn ConnectionPolicy>,
    notify: MarkNotifier,
}

impl SocketGate {
    /// Create a gate with its own bridge channel
    pub fn new(
        config: BridgeConfig,
        policy: Arc<dyn ConnectionPolicy>,
        notify: MarkNotifier,
    ) -> Self {
        Self {
            bridge: Bridge::new("socket_mark", config),
            policy,
            notify,
        }
    }

    /// Gate a freshly created socket before it connects.
    ///
    /// Ordering invariant: the host applies the attribute *before*
    /// delivering the mark, since the gate cannot verify it post hoc. On
    /// timeout the connection proceeds unmarked rather than failing.
    pub async fn mark(
        &self,
        network: NetworkType,
        address: &str,
        socket: &mut SocketHandle,
    ) -> Result<()> {
        if self.policy.should_block(network, address) {
            return Err(EngineError::ConnectionBlocked);
        }

        let outcome = self
            .bridge
            .request(socket.fd(), |id, value| {
                (self.notify)(SocketMark { id, value })
            })
            .await;

        if outcome.is_timed_out() {
            // Fail open: the host never answered, let the connection through.
            warn!(fd = socket.fd(), %network, address, "socket mark timed out, proceeding unmarked");
        }
        Ok(())
    }

    /// External delivery entry point: the host finished marking `mark.id`.
    ///
    /// Safe for late or duplicate deliveries; the write lands in the
    /// registry and is simply never read if no request is polling.
    pub fn deliver_mark(&self, mark: SocketMark) {
        self.bridge.deliver(mark.id, ());
    }

    /// Timing of the mark channel
    pub fn config(&self) -> &BridgeConfig {
        self.bridge.config()
    }
}
