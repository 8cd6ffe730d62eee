use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    LOCAL_GATEWAY_PORT, LOCAL_P2P_PORT, LOCAL_PLATFORM_ACTIVATION_HEIGHT, MAINNET_GATEWAY_PORT,
    MAINNET_P2P_PORT, MAINNET_PLATFORM_ACTIVATION_HEIGHT, TESTNET_GATEWAY_PORT, TESTNET_P2P_PORT,
    TESTNET_PLATFORM_ACTIVATION_HEIGHT,
};
use crate::error::Error;

/// Network environment a client talks to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    Mainnet,
    /// Public test network
    #[default]
    Testnet,
    /// Local development network
    Local,
}

impl Network {
    /// Lowercase network name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Local => "local",
        }
    }

    /// Peer-to-peer port nodes announce in the registry
    pub fn default_p2p_port(self) -> u16 {
        match self {
            Self::Mainnet => MAINNET_P2P_PORT,
            Self::Testnet => TESTNET_P2P_PORT,
            Self::Local => LOCAL_P2P_PORT,
        }
    }

    /// Public gateway port clients should connect to
    pub fn gateway_port(self) -> u16 {
        match self {
            Self::Mainnet => MAINNET_GATEWAY_PORT,
            Self::Testnet => TESTNET_GATEWAY_PORT,
            Self::Local => LOCAL_GATEWAY_PORT,
        }
    }

    /// Core chain height at which the platform activated
    pub fn platform_activation_height(self) -> u32 {
        match self {
            Self::Mainnet => MAINNET_PLATFORM_ACTIVATION_HEIGHT,
            Self::Testnet => TESTNET_PLATFORM_ACTIVATION_HEIGHT,
            Self::Local => LOCAL_PLATFORM_ACTIVATION_HEIGHT,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "local" | "devnet" | "regtest" => Ok(Self::Local),
            other => Err(Error::invalid_argument(format!("Unknown network: {other}"))),
        }
    }
}
