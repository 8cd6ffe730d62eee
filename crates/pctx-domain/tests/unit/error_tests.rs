//! Unit tests for domain error types

use pctx_domain::{Error, ProviderFailure};

#[test]
fn test_network_error_is_transient() {
    let error = Error::network("connection refused");
    assert!(error.is_transient());
    assert!(!error.is_validation());
}

#[test]
fn test_timeout_error_is_transient() {
    assert!(Error::timeout("status request").is_transient());
}

#[test]
fn test_http_status_classification() {
    assert!(Error::http(503, "unavailable").is_transient());
    assert!(Error::http(429, "slow down").is_transient());
    assert!(!Error::http(429, "slow down").is_validation());

    let bad_request = Error::http(400, "bad request");
    assert!(!bad_request.is_transient());
    assert!(bad_request.is_validation());
}

#[test]
fn test_invalid_response_is_not_retried() {
    let error = Error::invalid_response("missing blockHeight");
    assert!(!error.is_transient());
    assert!(error.is_validation());
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_err.into();
    assert!(matches!(error, Error::Json { .. }));
    assert!(error.is_validation());
}

#[test]
fn test_not_found_classification() {
    assert!(Error::http(404, "no route").is_not_found());
    assert!(Error::not_supported("getQuorumKeys").is_not_found());
    assert!(!Error::http(500, "boom").is_not_found());
}

#[test]
fn test_all_failed_lists_every_provider() {
    let error = Error::all_failed(
        "getLatestPlatformBlockHeight",
        vec![
            ProviderFailure {
                provider: "bridge".to_string(),
                reason: "Timeout: bridge request".to_string(),
            },
            ProviderFailure {
                provider: "status-service".to_string(),
                reason: "HTTP 502: bad gateway".to_string(),
            },
        ],
    );
    let message = error.to_string();
    assert!(message.contains("getLatestPlatformBlockHeight"));
    assert!(message.contains("bridge: Timeout: bridge request"));
    assert!(message.contains("status-service: HTTP 502: bad gateway"));
    assert!(!error.is_transient());
}

#[test]
fn test_all_failed_without_providers() {
    let error = Error::all_failed("getBlockProposer", Vec::new());
    assert!(error.to_string().contains("no providers attempted"));
}

#[test]
fn test_configuration_error_with_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "pctx.toml");
    let error = Error::configuration_with_source("Failed to read config", io);
    match &error {
        Error::Configuration { message, source } => {
            assert_eq!(message, "Failed to read config");
            assert!(source.is_some());
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_gate_errors_display() {
    assert_eq!(
        Error::unavailable("bridge").to_string(),
        "Provider unavailable: bridge"
    );
    assert!(Error::degraded("node-list").to_string().contains("node-list"));
    assert!(
        Error::authentication("not authenticated")
            .to_string()
            .starts_with("Authentication error")
    );
}
