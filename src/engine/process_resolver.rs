// src/engine/process_resolver.rs
//! Process resolver: attributes a network flow to its owning package
//!
//! The engine cannot see which application owns a flow; the host runtime
//! can. The resolver sends the flow metadata across the bridge and waits
//! for the host to answer with a package name.
//!
//! Unlike the socket gate this channel fails closed: a timeout surfaces
//! as a distinct error, which callers treat as "unknown process".

use crate::bridge::correlation::CorrelationId;
use crate::bridge::request::{Bridge, BridgeConfig, BridgeOutcome};
use crate::engine::metadata::FlowMetadata;
use crate::utils::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Wire shape of a resolution query sent to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessQuery {
    pub id: CorrelationId,
    pub metadata: FlowMetadata,
}

/// Wire shape of the host's answer: `{"id": .., "value": ".."}`
#[derive(Debug, Deserialize)]
struct ProcessAnswer {
    id: CorrelationId,
    value: String,
}

/// One-way, non-blocking hand-off of a resolution query to the host
pub type ProcessNotifier = Arc<dyn Fn(ProcessQuery) + Send + Sync>;

/// Hook installed into the engine's flow-metadata path
pub struct ProcessResolver {
    bridge: Bridge<String>,
    notify: ProcessNotifier,
}

impl ProcessResolver {
    /// Create a resolver with its own bridge channel
    pub fn new(config: BridgeConfig, notify: ProcessNotifier) -> Self {
        Self {
            bridge: Bridge::new("process_resolve", config),
            notify,
        }
    }

    /// Resolve the package owning a flow.
    ///
    /// Absent metadata fails immediately with `InvalidNetwork`; no
    /// correlation ID is consumed and no poll loop is entered. A deadline
    /// without a delivery fails with `ResolutionTimeout`.
    pub async fn resolve(&self, metadata: Option<FlowMetadata>) -> Result<String> {
        let metadata = metadata.ok_or(EngineError::InvalidNetwork)?;

        let outcome = self
            .bridge
            .request(metadata, |id, metadata| {
                (self.notify)(ProcessQuery { id, metadata })
            })
            .await;

        match outcome {
            BridgeOutcome::Delivered(name) => Ok(name),
            BridgeOutcome::TimedOut => Err(EngineError::ResolutionTimeout),
        }
    }

    /// External delivery entry point: an encoded `{id, value}` answer.
    ///
    /// Malformed payloads are dropped here, never surfaced to the engine;
    /// the waiting request simply observes an ordinary timeout.
    pub fn deliver_name(&self, payload: &str) {
        match serde_json::from_str::<ProcessAnswer>(payload) {
            Ok(answer) => {
                self.bridge.deliver(answer.id, answer.value);
            }
            Err(e) => {
                debug!(error = %e, "dropping malformed process answer");
            }
        }
    }

    /// Timing of the resolution channel
    pub fn config(&self) -> &BridgeConfig {
        self.bridge.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::metadata::NetworkType;
    use std::time::Duration;
    use tokio::time::{sleep, Instant};

    fn sample_metadata() -> FlowMetadata {
        FlowMetadata {
            network: NetworkType::Tcp,
            source_ip: "10.0.0.2".parse().unwrap(),
            source_port: 40000,
            destination_ip: "142.250.74.46".parse().unwrap(),
            destination_port: 443,
            host: None,
        }
    }

    fn resolver_with(notify: ProcessNotifier) -> ProcessResolver {
        ProcessResolver::new(BridgeConfig::new(Duration::from_millis(200)), notify)
    }

    #[tokio::test]
    async fn test_absent_metadata_fails_immediately() {
        let resolver = resolver_with(Arc::new(|_| panic!("notify must not fire")));

        let start = std::time::Instant::now();
        let result = resolver.resolve(None).await;
        assert!(matches!(result, Err(EngineError::InvalidNetwork)));
        assert!(start.elapsed() < Duration::from_millis(1));
        assert!(resolver.bridge.registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_closed_and_is_distinct() {
        let resolver = resolver_with(Arc::new(|_| {}));

        let start = Instant::now();
        let result = resolver.resolve(Some(sample_metadata())).await;
        assert!(start.elapsed() >= resolver.config().deadline);
        assert!(matches!(result, Err(EngineError::ResolutionTimeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivered_answer_resolves() {
        let queries: Arc<parking_lot::Mutex<Vec<ProcessQuery>>> =
            Arc::new(parking_lot::Mutex::new(Vec::new()));
        let inbox = Arc::clone(&queries);
        let resolver = Arc::new(resolver_with(Arc::new(move |query| {
            inbox.lock().push(query);
        })));

        // Host side: answer the query with the owning package name.
        let host = Arc::clone(&resolver);
        let host_queries = Arc::clone(&queries);
        tokio::spawn(async move {
            loop {
                if let Some(query) = host_queries.lock().pop() {
                    let payload =
                        format!(r#"{{"id":{},"value":"com.android.chrome"}}"#, query.id);
                    host.deliver_name(&payload);
                    return;
                }
                sleep(Duration::from_millis(5)).await;
            }
        });

        let name = resolver.resolve(Some(sample_metadata())).await.unwrap();
        assert_eq!(name, "com.android.chrome");
    }

    #[tokio::test]
    async fn test_malformed_delivery_is_dropped() {
        let resolver = resolver_with(Arc::new(|_| {}));

        resolver.deliver_name("not json at all");
        resolver.deliver_name(r#"{"id":"string-not-int","value":"x"}"#);
        resolver.deliver_name(r#"{"id":1}"#);

        assert!(resolver.bridge.registry().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_delivery_first_write_wins() {
        let resolver = resolver_with(Arc::new(|_| {}));

        resolver.deliver_name(r#"{"id":9,"value":"com.first"}"#);
        resolver.deliver_name(r#"{"id":9,"value":"com.second"}"#);

        assert_eq!(
            resolver.bridge.registry().try_get(CorrelationId(9)).as_deref(),
            Some("com.first")
        );
    }

    #[test]
    fn test_query_wire_shape() {
        let query = ProcessQuery {
            id: CorrelationId(5),
            metadata: sample_metadata(),
        };
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(encoded["id"], 5);
        assert_eq!(encoded["metadata"]["network"], "tcp");
    }
}
