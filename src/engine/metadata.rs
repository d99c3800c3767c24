// src/engine/metadata.rs
//! Flow metadata carried to the host with a resolution query

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Transport protocol of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Tcp,
    Udp,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Tcp => write!(f, "tcp"),
            NetworkType::Udp => write!(f, "udp"),
        }
    }
}

/// Metadata describing one network flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMetadata {
    /// Transport protocol
    pub network: NetworkType,

    /// Source endpoint
    pub source_ip: IpAddr,
    pub source_port: u16,

    /// Destination endpoint
    pub destination_ip: IpAddr,
    pub destination_port: u16,

    /// Destination hostname when known (e.g. from SNI or DNS)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}
