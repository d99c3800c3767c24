// src/utils/errors.rs
//! Error types for the bridge core
//!
//! Every failure here degrades a single connection or flow attribution;
//! nothing in this taxonomy is fatal to the process.

use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// Connection refused by the host policy before any bridge interaction
    #[error("connection blocked by policy")]
    ConnectionBlocked,

    /// Flow metadata was absent or unusable; no bridge round-trip occurred
    #[error("invalid network metadata")]
    InvalidNetwork,

    /// The host did not resolve the owning package before the deadline
    #[error("package resolver timeout")]
    ResolutionTimeout,

    /// Configuration could not be loaded or validated
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A state snapshot could not be serialized
    #[error("state serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EngineError>;
