// src/bridge/correlation.rs
//! Correlation identifiers
//!
//! Each bridge channel owns one generator. IDs are strictly increasing,
//! never reused within the channel's lifetime, and never zero (zero is
//! reserved as a sentinel by embedders).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token linking an outbound request to its out-of-band answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub u64);

impl CorrelationId {
    /// Raw 64-bit value as carried on the wire
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lock-free generator of strictly monotonic correlation IDs
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose first ID is 1
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Allocate the next ID; no two concurrent callers receive the same value
    pub fn next_id(&self) -> CorrelationId {
        CorrelationId(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
