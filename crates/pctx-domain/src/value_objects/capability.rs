use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A capability tag a context provider can declare
///
/// The set is closed: providers cannot invent new tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Block height, block time, core chain-locked height, version
    PlatformState,
    /// Consensus quorum public keys
    QuorumKeys,
    /// Proposer lookups and proposer block counts
    BlockProposer,
    /// Signing on behalf of the caller
    Signing,
    /// Broadcasting state transitions
    Broadcasting,
    /// Push subscriptions
    Subscriptions,
}

/// Ordered set of capability tags
pub type CapabilitySet = BTreeSet<Capability>;

impl Capability {
    /// Every capability tag
    pub const ALL: [Self; 6] = [
        Self::PlatformState,
        Self::QuorumKeys,
        Self::BlockProposer,
        Self::Signing,
        Self::Broadcasting,
        Self::Subscriptions,
    ];

    /// Tag name as used on the wire and in configuration
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlatformState => "platform-state",
            Self::QuorumKeys => "quorum-keys",
            Self::BlockProposer => "block-proposer",
            Self::Signing => "signing",
            Self::Broadcasting => "broadcasting",
            Self::Subscriptions => "subscriptions",
        }
    }

    /// Capabilities assumed for providers that do not declare any
    pub fn baseline() -> CapabilitySet {
        [Self::PlatformState, Self::BlockProposer].into_iter().collect()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::invalid_argument(format!("Unknown capability: {s}")))
    }
}
