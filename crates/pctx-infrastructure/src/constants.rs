//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `pctx_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "pctx.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "pctx";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "PCTX";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "PCTX_LOG";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "pctx";

// ============================================================================
// PRIORITY PROVIDER CONSTANTS
// ============================================================================

/// Name the priority provider reports when nested in another one
pub const PRIORITY_PROVIDER_NAME: &str = "priority";

/// Default priority of a paired-device bridge
pub const BRIDGE_DEFAULT_PRIORITY: i32 = 100;

/// Default priority of a dedicated status service
pub const STATUS_SERVICE_DEFAULT_PRIORITY: i32 = 50;

/// Default priority of the generic node list fallback
pub const NODE_LIST_DEFAULT_PRIORITY: i32 = 10;

/// Default freshness window of the cross-provider result cache (ms)
pub const PRIORITY_CACHE_TTL_MS: u64 = 5_000;

// ============================================================================
// BRIDGE CONSTANTS
// ============================================================================

/// Buffer of the in-process bridge channel, in frames
pub const BRIDGE_CHANNEL_BUFFER: usize = 64;
