// src/lib.rs
//! Tunbridge: host bridge core for a TUN proxy engine
//!
//! The engine and the host runtime live on opposite sides of an FFI
//! boundary: the engine needs synchronous answers (mark this socket,
//! which package owns this flow) that only the host can produce, and the
//! host answers asynchronously on its own schedule. This crate turns
//! those asynchronous answers into synchronous-looking results without
//! blocking either side.
//!
//! # Architecture
//!
//! - **bridge**: correlation IDs, the shared result registry, and the
//!   poll-until-deadline request pattern
//! - **engine**: the two hooks built on the bridge (socket gate and
//!   process resolver), flow metadata, and tunnel run state
//! - **observability**: tracing and metrics initialization
//! - **utils**: configuration and error types
//!
//! The transport that carries notifications to the host and deliveries
//! back is the embedder's concern; the hooks only take notify callbacks
//! and expose delivery entry points.

// Public module exports
pub mod bridge;
pub mod engine;
pub mod observability;
pub mod utils;

// Re-export commonly used types
pub use bridge::{Bridge, BridgeConfig, BridgeOutcome, CorrelationId};
pub use engine::{FlowMetadata, NetworkType, ProcessResolver, SocketGate, TunnelState};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
