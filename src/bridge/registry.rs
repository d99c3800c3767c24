// src/bridge/registry.rs
//! Result registry shared between the request and delivery sides
//!
//! A write-once-per-key, read-many map from correlation ID to result.
//! Insertions come from the host's delivery path on arbitrary threads;
//! non-blocking lookups come from the bridge poll loops. Sharded locking
//! keeps unrelated IDs from serializing each other. Entries are never
//! evicted; IDs are bounded by process uptime.

use crate::bridge::correlation::CorrelationId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use metrics::counter;

/// Metric: deliveries for an ID that already had an entry
pub const DUPLICATE_DELIVERIES: &str = "tunbridge_duplicate_deliveries_total";

/// Thread-safe write-once result store, keyed by correlation ID
pub struct ResultRegistry<T> {
    entries: DashMap<CorrelationId, T>,

    /// Channel label attached to emitted metrics
    channel: &'static str,
}

impl<T> ResultRegistry<T> {
    /// Create an empty registry for the named channel
    pub fn new(channel: &'static str) -> Self {
        Self {
            entries: DashMap::new(),
            channel,
        }
    }

    /// Record a result for an ID.
    ///
    /// The first write for an ID wins; later writes are accepted silently
    /// (the requester has already been satisfied) but counted. Returns
    /// whether this call inserted the entry.
    pub fn put(&self, id: CorrelationId, value: T) -> bool {
        match self.entries.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(_) => {
                counter!(DUPLICATE_DELIVERIES, "channel" => self.channel).increment(1);
                false
            }
        }
    }

    /// Whether an entry exists for this ID (non-blocking)
    pub fn contains(&self, id: CorrelationId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> ResultRegistry<T> {
    /// Non-blocking lookup; safe under concurrent `put` on other IDs
    pub fn try_get(&self, id: CorrelationId) -> Option<T> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_read_after_write_visibility() {
        let registry = ResultRegistry::new("test");
        let id = CorrelationId(7);

        assert!(registry.put(id, "com.example.app".to_string()));

        let registry = Arc::new(registry);
        let mut handles = vec![];
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || registry.try_get(id)));
        }
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("com.example.app"));
        }
    }

    #[test]
    fn test_unwritten_ids_stay_absent() {
        let registry: ResultRegistry<String> = ResultRegistry::new("test");
        for raw in [1u64, 2, 99, u64::MAX] {
            assert!(registry.try_get(CorrelationId(raw)).is_none());
            assert!(!registry.contains(CorrelationId(raw)));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_first_write_wins() {
        let registry = ResultRegistry::new("test");
        let id = CorrelationId(1);

        assert!(registry.put(id, "first".to_string()));
        assert!(!registry.put(id, "second".to_string()));
        assert_eq!(registry.try_get(id).as_deref(), Some("first"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_writes_distinct_ids() {
        let registry = Arc::new(ResultRegistry::new("test"));
        let mut handles = vec![];

        for worker in 0..8u64 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for i in 0..500u64 {
                    let id = CorrelationId(worker * 1000 + i + 1);
                    assert!(registry.put(id, id.as_u64()));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 4000);
        // Each entry holds its own value, no cross-talk between keys.
        for worker in 0..8u64 {
            for i in 0..500u64 {
                let id = CorrelationId(worker * 1000 + i + 1);
                assert_eq!(registry.try_get(id), Some(id.as_u64()));
            }
        }
    }

    #[test]
    fn test_unit_value_presence_is_the_signal() {
        let registry: ResultRegistry<()> = ResultRegistry::new("test");
        let id = CorrelationId(3);

        assert!(!registry.contains(id));
        registry.put(id, ());
        assert!(registry.contains(id));
        assert!(registry.try_get(id).is_some());
    }
}
