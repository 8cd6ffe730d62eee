//! Provider Constants
//!
//! Constants specific to provider implementations. Domain constants (freshness
//! windows, ports, activation heights) live in `pctx_domain::constants`.

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Default timeout for status-service requests (milliseconds)
pub const STATUS_SERVICE_TIMEOUT_MS: u64 = 10_000;

/// Default timeout for a single node status request (milliseconds)
pub const NODE_STATUS_TIMEOUT_MS: u64 = 5_000;

/// Default timeout for discovery registry requests (milliseconds)
pub const DISCOVERY_TIMEOUT_MS: u64 = 10_000;

/// Default URL scheme used to reach discovered nodes
pub const DEFAULT_NODE_SCHEME: &str = "https";

// ============================================================================
// STATUS SERVICE ENDPOINTS
// ============================================================================

/// Aggregate platform status endpoint
pub const STATUS_PATH: &str = "/status";

/// Quorum keys endpoint
pub const QUORUMS_PATH: &str = "/quorums";

// ============================================================================
// RETRY CONSTANTS
// ============================================================================

/// Default number of attempts (first try included)
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry (milliseconds)
pub const RETRY_BASE_DELAY_MS: u64 = 200;

/// Default exponential backoff multiplier
pub const RETRY_BACKOFF_FACTOR: f64 = 2.0;

/// Upper bound for a single retry delay (milliseconds)
pub const RETRY_MAX_DELAY_MS: u64 = 5_000;

// ============================================================================
// BRIDGE CONSTANTS
// ============================================================================

/// Default per-request timeout on the bridge (milliseconds)
pub const BRIDGE_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default maximum frame size on the bridge transport (bytes)
pub const BRIDGE_MAX_FRAME_SIZE: usize = 512;

/// Frame header length: 16-byte correlation id, u16 index, u16 total
pub const BRIDGE_FRAME_HEADER_LEN: usize = 20;

/// Maximum partially reassembled messages held at once on the bridge
pub const BRIDGE_MAX_PARTIAL_MESSAGES: usize = 64;

// ============================================================================
// EVENT BUS CONSTANTS
// ============================================================================

/// Default tokio broadcast channel capacity
pub const EVENT_BUS_CAPACITY: usize = 1024;

// ============================================================================
// PROVIDER NAMES
// ============================================================================

/// Status service provider name
pub const STATUS_SERVICE_PROVIDER_NAME: &str = "status-service";

/// Node list provider name
pub const NODE_LIST_PROVIDER_NAME: &str = "node-list";

/// Bridge provider name
pub const BRIDGE_PROVIDER_NAME: &str = "bridge";

// ============================================================================
// DISCOVERY CONSTANTS
// ============================================================================

/// Registry endpoint listing mainnet nodes
pub const MAINNET_REGISTRY_URL: &str = "https://quorums.mainnet.networks.dash.org/masternodes";

/// Registry endpoint listing testnet nodes
pub const TESTNET_REGISTRY_URL: &str = "https://quorums.testnet.networks.dash.org/masternodes";

/// Static mainnet nodes used when the registry is unusable
pub const MAINNET_FALLBACK_NODES: &[&str] = &["dapi.mainnet.networks.dash.org:443"];

/// Static testnet nodes used when the registry is unusable
pub const TESTNET_FALLBACK_NODES: &[&str] = &["52.12.176.90:1443", "44.240.98.102:1443"];

/// Static local nodes used when the registry is unusable
pub const LOCAL_FALLBACK_NODES: &[&str] = &["127.0.0.1:1443"];
