// src/bridge/mod.rs
//! Correlated request/response bridge between the engine and the host
//!
//! The bridge is built from three small parts:
//!
//! - **correlation**: strictly monotonic IDs, one generator per channel
//! - **registry**: write-once, read-many result store shared between the
//!   engine's poll loops and the host's delivery path
//! - **request**: the poll-until-deadline pattern tying the two together

pub mod correlation;
pub mod registry;
pub mod request;

pub use correlation::{CorrelationId, IdGenerator};
pub use registry::ResultRegistry;
pub use request::{Bridge, BridgeConfig, BridgeOutcome};
