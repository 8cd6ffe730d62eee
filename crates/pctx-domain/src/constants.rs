//! Domain layer constants
//!
//! Values that define the behaviour of context providers independently of
//! how they are wired. Infrastructure-specific constants live in
//! `pctx_infrastructure::constants`.

// ============================================================================
// CACHE FRESHNESS CONSTANTS
// ============================================================================

/// Default freshness window for platform-state values (milliseconds)
pub const PLATFORM_STATE_CACHE_TTL_MS: u64 = 5_000;

/// Default freshness window for consensus-key material (milliseconds)
pub const QUORUM_KEYS_CACHE_TTL_MS: u64 = 60_000;

/// Default freshness window for node discovery results (seconds)
pub const DISCOVERY_CACHE_TTL_SECS: u64 = 300;

/// Default maximum number of entries held by a provider cache
pub const DEFAULT_CACHE_CAPACITY: usize = 1_000;

// ============================================================================
// NETWORK PORT CONSTANTS
// ============================================================================

/// Default peer-to-peer port on mainnet
pub const MAINNET_P2P_PORT: u16 = 9_999;

/// Default peer-to-peer port on testnet
pub const TESTNET_P2P_PORT: u16 = 19_999;

/// Default peer-to-peer port on a local devnet
pub const LOCAL_P2P_PORT: u16 = 20_001;

/// Public gateway port on mainnet
pub const MAINNET_GATEWAY_PORT: u16 = 443;

/// Public gateway port on testnet
pub const TESTNET_GATEWAY_PORT: u16 = 1_443;

/// Public gateway port on a local devnet
pub const LOCAL_GATEWAY_PORT: u16 = 1_443;

// ============================================================================
// PLATFORM ACTIVATION CONSTANTS
// ============================================================================

/// Core chain height at which the platform activated on mainnet
pub const MAINNET_PLATFORM_ACTIVATION_HEIGHT: u32 = 2_132_092;

/// Core chain height at which the platform activated on testnet
pub const TESTNET_PLATFORM_ACTIVATION_HEIGHT: u32 = 1_090_319;

/// Core chain height at which the platform activated on a local devnet
pub const LOCAL_PLATFORM_ACTIVATION_HEIGHT: u32 = 1;

// ============================================================================
// SYNTHESIZED STATUS CONSTANTS
// ============================================================================

/// Average platform block interval used when no backend reports one (milliseconds)
pub const DEFAULT_TIME_PER_BLOCK_MS: u64 = 5_000;

/// Version string reported by synthesized status data
pub const SYNTHESIZED_PLATFORM_VERSION: &str = "unknown";
