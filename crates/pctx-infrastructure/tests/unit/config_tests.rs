//! Configuration Tests
//!
//! The environment tests mutate process variables and are ignored by default:
//!
//! ```bash
//! cargo test -p pctx-infrastructure --test unit config -- --test-threads=1 --ignored
//! ```

use std::env;
use std::fs;

use pctx_domain::{Error, Network};
use pctx_infrastructure::config::loader::validate_app_config;
use pctx_infrastructure::config::{
    AppConfig, BridgeSettings, ConfigBuilder, ConfigLoader, LoggingConfig, NodeListSettings,
    RetrySettings,
};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("pctx.toml");
    fs::write(&path, content).unwrap();
    path
}

fn assert_invalid(config: &AppConfig) {
    match validate_app_config(config) {
        Err(Error::Configuration { .. }) => {}
        other => panic!("Expected configuration error, got {other:?}"),
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Test a TOML file overrides defaults section by section
#[test]
fn test_load_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
network = "mainnet"

[logging]
level = "debug"

[providers.status_service]
base_url = "https://status.example.org"

[providers.priority]
cache_results = false
bridge_priority = 7

[retry]
max_attempts = 5

[discovery.fallback_nodes]
mainnet = ["1.1.1.1:443"]
"#,
    );

    let config = ConfigLoader::new().with_config_path(&path).load().unwrap();

    assert_eq!(config.network, Network::Mainnet);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.providers.status_service.base_url.as_deref(),
        Some("https://status.example.org")
    );
    assert!(!config.providers.priority.cache_results);
    assert_eq!(config.providers.priority.bridge_priority, 7);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(
        config.discovery.fallback_nodes["mainnet"],
        vec!["1.1.1.1:443".to_string()]
    );
    // Untouched sections keep their defaults
    assert_eq!(config.providers.node_list, NodeListSettings::default());
    assert_eq!(config.providers.bridge, BridgeSettings::default());
}

/// Test a missing file yields the defaults
#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new().with_config_path(dir.path().join("absent.toml"));
    let config = loader.load().unwrap();

    assert_eq!(config.network, Network::Testnet);
    assert_eq!(config.retry, RetrySettings::default());
    assert!(loader.config_path().is_some());
}

/// Test loading rejects invalid values
#[test]
fn test_load_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[logging]\nlevel = \"loud\"\n");
    let err = ConfigLoader::new().with_config_path(&path).load().unwrap_err();
    assert!(err.to_string().contains("Invalid log level"));

    let path = write_config(&dir, "network = \"moonnet\"\n");
    assert!(ConfigLoader::new().with_config_path(&path).load().is_err());
}

/// Test a saved configuration loads back unchanged
#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let config = ConfigBuilder::new()
        .with_network(Network::Local)
        .with_status_service("http://127.0.0.1:8080")
        .with_nodes(vec!["127.0.0.1:1443".to_string()])
        .build()
        .unwrap();

    let loader = ConfigLoader::new();
    loader.save_to_file(&config, &path).unwrap();
    let reloaded = ConfigLoader::new().with_config_path(&path).load().unwrap();

    assert_eq!(reloaded, config);
}

// ============================================================================
// Validation
// ============================================================================

/// Test the defaults are valid
#[test]
fn test_default_config_is_valid() {
    validate_app_config(&AppConfig::default()).unwrap();
}

/// Test invalid provider settings are rejected
#[test]
fn test_invalid_provider_settings() {
    let mut config = AppConfig::default();
    config.providers.status_service.base_url = Some("ftp://status".to_string());
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.providers.status_service.base_url = Some("not a url".to_string());
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.providers.node_list.scheme = "gopher".to_string();
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.providers.node_list.timeout_ms = 0;
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.providers.bridge.max_frame_size = 4;
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.providers.priority.cache_capacity = 0;
    assert_invalid(&config);

    // A disabled cache needs no capacity
    config.providers.priority.cache_results = false;
    validate_app_config(&config).unwrap();
}

/// Test invalid discovery and retry settings are rejected
#[test]
fn test_invalid_discovery_and_retry_settings() {
    let mut config = AppConfig::default();
    config
        .discovery
        .registry_urls
        .insert("moonnet".to_string(), "https://registry.example.org".to_string());
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.discovery.cache_ttl_secs = 0;
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.retry.max_attempts = 0;
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.retry.backoff_factor = 0.5;
    assert_invalid(&config);

    let mut config = AppConfig::default();
    config.retry.base_delay_ms = 500;
    config.retry.max_delay_ms = 100;
    assert_invalid(&config);
}

/// Test the builder validates on build
#[test]
fn test_builder_validates() {
    let err = ConfigBuilder::new()
        .with_logging(LoggingConfig {
            level: "verbose".to_string(),
            ..LoggingConfig::default()
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));

    let config = ConfigBuilder::new()
        .with_retry(RetrySettings {
            max_attempts: 1,
            ..RetrySettings::default()
        })
        .build()
        .unwrap();
    assert_eq!(config.retry.max_attempts, 1);
}

// ============================================================================
// Environment
// ============================================================================

/// Helper to set env var safely
fn set_env(key: &str, value: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::set_var(key, value);
    }
}

/// Helper to remove env var safely
fn remove_env(key: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::remove_var(key);
    }
}

/// Test `PCTX_` variables override file values
#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[retry]\nmax_attempts = 5\n");
    set_env("PCTX_RETRY__MAX_ATTEMPTS", "7");
    set_env("PCTX_NETWORK", "local");

    let config = ConfigLoader::new().with_config_path(&path).load();

    remove_env("PCTX_RETRY__MAX_ATTEMPTS");
    remove_env("PCTX_NETWORK");

    let config = config.unwrap();
    assert_eq!(config.retry.max_attempts, 7);
    assert_eq!(config.network, Network::Local);
}

/// Test a custom prefix ignores the default one
#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_custom_env_prefix() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    set_env("PCTX_RETRY__MAX_ATTEMPTS", "9");
    set_env("MYAPP_RETRY__MAX_ATTEMPTS", "4");

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("MYAPP")
        .load();

    remove_env("PCTX_RETRY__MAX_ATTEMPTS");
    remove_env("MYAPP_RETRY__MAX_ATTEMPTS");

    assert_eq!(config.unwrap().retry.max_attempts, 4);
}
