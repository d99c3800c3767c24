// src/engine/mod.rs
//! Engine-side hooks and state
//!
//! - **socket_gate**: socket-creation hook (policy check + bridged mark)
//! - **process_resolver**: flow-attribution hook (bridged package lookup)
//! - **metadata**: flow metadata wire shapes
//! - **state**: mutex-guarded tunnel run state and options snapshot

pub mod metadata;
pub mod process_resolver;
pub mod socket_gate;
pub mod state;

pub use metadata::{FlowMetadata, NetworkType};
pub use process_resolver::{ProcessNotifier, ProcessQuery, ProcessResolver};
pub use socket_gate::{ConnectionPolicy, MarkNotifier, SocketGate, SocketHandle, SocketMark};
pub use state::{AccessControl, AccessControlMode, TunnelState, VpnOptions};
