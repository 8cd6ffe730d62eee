use serde::{Deserialize, Serialize};
use std::fmt;

use super::capability::Capability;

/// One logical operation of the context-provider contract
///
/// Used to route calls to capable providers, to key the cross-provider
/// cache and to name operations in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextOperation {
    /// Latest platform block height
    LatestPlatformBlockHeight,
    /// Latest platform block time (epoch millis)
    LatestPlatformBlockTime,
    /// Latest core chain-locked height seen by the platform
    LatestPlatformCoreChainLockedHeight,
    /// Latest platform protocol version
    LatestPlatformVersion,
    /// Average time per block (millis)
    TimePerBlockMillis,
    /// Number of blocks proposed by one proposer
    ProposerBlockCount,
    /// Proposer of the block at a given height
    BlockProposer,
    /// Current consensus quorum keys
    QuorumKeys,
}

impl ContextOperation {
    /// Operation name as reported in events and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LatestPlatformBlockHeight => "getLatestPlatformBlockHeight",
            Self::LatestPlatformBlockTime => "getLatestPlatformBlockTime",
            Self::LatestPlatformCoreChainLockedHeight => "getLatestPlatformCoreChainLockedHeight",
            Self::LatestPlatformVersion => "getLatestPlatformVersion",
            Self::TimePerBlockMillis => "getTimePerBlockMillis",
            Self::ProposerBlockCount => "getProposerBlockCount",
            Self::BlockProposer => "getBlockProposer",
            Self::QuorumKeys => "getQuorumKeys",
        }
    }

    /// Capability a provider must declare to be asked for this operation
    pub fn required_capability(self) -> Capability {
        match self {
            Self::LatestPlatformBlockHeight
            | Self::LatestPlatformBlockTime
            | Self::LatestPlatformCoreChainLockedHeight
            | Self::LatestPlatformVersion
            | Self::TimePerBlockMillis => Capability::PlatformState,
            Self::ProposerBlockCount | Self::BlockProposer => Capability::BlockProposer,
            Self::QuorumKeys => Capability::QuorumKeys,
        }
    }

    /// Whether the contract allows this operation to resolve to nothing
    pub fn is_nullable(self) -> bool {
        matches!(
            self,
            Self::ProposerBlockCount | Self::BlockProposer | Self::QuorumKeys
        )
    }

    /// Cache key for this operation, qualified by its argument if any
    pub fn cache_key(self, argument: Option<&str>) -> String {
        match argument {
            Some(arg) => format!("{}:{arg}", self.as_str()),
            None => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContextOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
