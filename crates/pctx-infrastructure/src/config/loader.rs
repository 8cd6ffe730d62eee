//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables and
//! default values through figment.

use crate::config::{AppConfig, DiscoverySettings, LoggingConfig, ProvidersConfig, RetrySettings};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::{ErrorContext, config_error};
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pctx_domain::error::{Error, Result};
use pctx_domain::value_objects::Network;
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `PCTX_PROVIDERS__PRIORITY__LOG_ERRORS`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // Nested keys use a double underscore (e.g., PCTX_RETRY__MAX_ATTEMPTS)
        figment = figment
            .merge(Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).config_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(&config.logging)?;
    validate_providers_config(&config.providers)?;
    validate_discovery_config(&config.discovery)?;
    validate_retry_config(&config.retry)?;
    Ok(())
}

fn non_zero(value: u64, what: &str) -> Result<()> {
    if value == 0 {
        return Err(Error::configuration(format!("{what} cannot be 0")));
    }
    Ok(())
}

fn validate_url(url: &str, what: &str) -> Result<()> {
    let parsed =
        reqwest::Url::parse(url).map_err(|e| config_error(e, &format!("Invalid {what}: {url}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "{what} must use http or https: {url}"
        )));
    }
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

fn validate_providers_config(config: &ProvidersConfig) -> Result<()> {
    let status = &config.status_service;
    if let Some(base_url) = &status.base_url {
        validate_url(base_url, "status service URL")?;
    }
    non_zero(status.timeout_ms, "Status service timeout")?;
    non_zero(status.cache_capacity as u64, "Status service cache capacity")?;

    let nodes = &config.node_list;
    non_zero(nodes.timeout_ms, "Node list timeout")?;
    non_zero(nodes.cache_capacity as u64, "Node list cache capacity")?;
    if !matches!(nodes.scheme.as_str(), "http" | "https") {
        return Err(Error::configuration(format!(
            "Node list scheme must be http or https, got {}",
            nodes.scheme
        )));
    }

    let bridge = &config.bridge;
    non_zero(bridge.request_timeout_ms, "Bridge request timeout")?;
    non_zero(bridge.cache_capacity as u64, "Bridge cache capacity")?;
    if bridge.max_frame_size <= pctx_providers::constants::BRIDGE_FRAME_HEADER_LEN {
        return Err(Error::configuration(format!(
            "Bridge frame size {} leaves no room for payload",
            bridge.max_frame_size
        )));
    }

    let priority = &config.priority;
    if priority.cache_results {
        non_zero(priority.cache_ttl_ms, "Priority cache TTL")?;
        non_zero(priority.cache_capacity as u64, "Priority cache capacity")?;
    }
    Ok(())
}

fn validate_discovery_config(config: &DiscoverySettings) -> Result<()> {
    non_zero(config.timeout_ms, "Discovery timeout")?;
    non_zero(config.cache_ttl_secs, "Discovery cache TTL")?;
    for (network, url) in &config.registry_urls {
        network
            .parse::<Network>()
            .map_err(|e| Error::configuration(format!("Invalid discovery network: {e}")))?;
        validate_url(url, "registry URL")?;
    }
    for network in config.fallback_nodes.keys() {
        network
            .parse::<Network>()
            .map_err(|e| Error::configuration(format!("Invalid fallback network: {e}")))?;
    }
    Ok(())
}

fn validate_retry_config(config: &RetrySettings) -> Result<()> {
    if config.max_attempts == 0 {
        return Err(Error::configuration("Retry max attempts must be at least 1"));
    }
    if !config.backoff_factor.is_finite() || config.backoff_factor < 1.0 {
        return Err(Error::configuration(format!(
            "Retry backoff factor must be at least 1.0, got {}",
            config.backoff_factor
        )));
    }
    if config.max_delay_ms < config.base_delay_ms {
        return Err(Error::configuration(
            "Retry max delay cannot be smaller than the base delay",
        ));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the network
    pub fn with_network(mut self, network: Network) -> Self {
        self.config.network = network;
        self
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Enable the status service at `base_url`
    pub fn with_status_service<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.providers.status_service.base_url = Some(base_url.into());
        self
    }

    /// Use a fixed node list instead of discovery
    pub fn with_nodes(mut self, nodes: Vec<String>) -> Self {
        self.config.providers.node_list.nodes = nodes;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.config.retry = retry;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
