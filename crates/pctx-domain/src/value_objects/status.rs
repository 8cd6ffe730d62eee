use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Where a [`PlatformStatus`] came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    /// Reported by a live backend
    #[default]
    Live,
    /// Placeholder values built without reaching any backend
    Synthesized,
}

/// Aggregate platform state returned by one status round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStatus {
    /// Latest platform block height
    pub block_height: u64,
    /// Latest platform block time (epoch millis)
    pub block_time: u64,
    /// Latest core chain-locked height
    pub core_chain_locked_height: u32,
    /// Platform protocol version
    pub version: String,
    /// Average time per block (millis)
    pub time_per_block: u64,
    /// Live or synthesized
    #[serde(default)]
    pub source: StatusSource,
}

impl PlatformStatus {
    /// Whether the values were synthesized rather than fetched
    pub fn is_synthesized(&self) -> bool {
        self.source == StatusSource::Synthesized
    }
}

/// Public key material of one consensus quorum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumInfo {
    /// Hex-encoded threshold public key
    #[serde(rename = "publicKey")]
    pub public_key: String,
    /// Quorum version
    #[serde(default)]
    pub version: u32,
    /// Quorum type, as a name or a numeric LLMQ type
    #[serde(rename = "type", default, deserialize_with = "string_or_number")]
    pub quorum_type: String,
}

/// Quorums keyed by quorum hash
pub type QuorumMap = BTreeMap<String, QuorumInfo>;

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for quorum type, got {other}"
        ))),
    }
}
