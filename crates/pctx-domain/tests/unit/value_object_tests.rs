//! Unit tests for domain value objects

use pctx_domain::{
    Capability, ContextOperation, Network, PlatformStatus, ProviderMetrics, QuorumInfo,
    StatusSource,
};
use std::str::FromStr;

// ============================================================================
// Capability
// ============================================================================

#[test]
fn test_capability_round_trips_through_its_tag() {
    for capability in Capability::ALL {
        assert_eq!(Capability::from_str(capability.as_str()).ok(), Some(capability));
    }
    assert!(Capability::from_str("teleportation").is_err());
}

#[test]
fn test_capability_serializes_kebab_case() {
    let json = serde_json::to_string(&Capability::PlatformState).unwrap();
    assert_eq!(json, "\"platform-state\"");
}

#[test]
fn test_baseline_capabilities() {
    let baseline = Capability::baseline();
    assert_eq!(baseline.len(), 2);
    assert!(baseline.contains(&Capability::PlatformState));
    assert!(baseline.contains(&Capability::BlockProposer));
    assert!(!baseline.contains(&Capability::QuorumKeys));
}

// ============================================================================
// ContextOperation
// ============================================================================

#[test]
fn test_operation_routing() {
    assert_eq!(
        ContextOperation::LatestPlatformVersion.required_capability(),
        Capability::PlatformState
    );
    assert_eq!(
        ContextOperation::BlockProposer.required_capability(),
        Capability::BlockProposer
    );
    assert_eq!(
        ContextOperation::QuorumKeys.required_capability(),
        Capability::QuorumKeys
    );
}

#[test]
fn test_operation_nullability() {
    assert!(ContextOperation::ProposerBlockCount.is_nullable());
    assert!(ContextOperation::QuorumKeys.is_nullable());
    assert!(!ContextOperation::LatestPlatformBlockHeight.is_nullable());
}

#[test]
fn test_operation_cache_key() {
    assert_eq!(
        ContextOperation::BlockProposer.cache_key(Some("42")),
        "getBlockProposer:42"
    );
    assert_eq!(
        ContextOperation::TimePerBlockMillis.cache_key(None),
        "getTimePerBlockMillis"
    );
}

// ============================================================================
// Network
// ============================================================================

#[test]
fn test_network_ports() {
    assert_eq!(Network::Testnet.default_p2p_port(), 19_999);
    assert_eq!(Network::Testnet.gateway_port(), 1_443);
    assert_eq!(Network::Mainnet.default_p2p_port(), 9_999);
    assert_eq!(Network::Mainnet.gateway_port(), 443);
}

#[test]
fn test_network_activation_heights() {
    assert_eq!(Network::Mainnet.platform_activation_height(), 2_132_092);
    assert_eq!(Network::Testnet.platform_activation_height(), 1_090_319);
    assert_eq!(Network::Local.platform_activation_height(), 1);
}

#[test]
fn test_network_parsing() {
    assert_eq!(Network::from_str("MAINNET").ok(), Some(Network::Mainnet));
    assert_eq!(Network::from_str("devnet").ok(), Some(Network::Local));
    assert!(Network::from_str("moonnet").is_err());
}

// ============================================================================
// ProviderMetrics / PlatformStatus / QuorumInfo
// ============================================================================

#[test]
fn test_metrics_success_rate() {
    let mut metrics = ProviderMetrics::default();
    assert_eq!(metrics.success_rate(), None);
    metrics.success_count = 3;
    metrics.error_count = 1;
    assert_eq!(metrics.total_attempts(), 4);
    assert_eq!(metrics.success_rate(), Some(0.75));
}

#[test]
fn test_platform_status_defaults_to_live() {
    let status: PlatformStatus = serde_json::from_value(serde_json::json!({
        "block_height": 10,
        "block_time": 1_700_000_000_000_u64,
        "core_chain_locked_height": 900,
        "version": "1.4.0",
        "time_per_block": 5000
    }))
    .unwrap();
    assert_eq!(status.source, StatusSource::Live);
    assert!(!status.is_synthesized());
}

#[test]
fn test_quorum_info_accepts_numeric_type() {
    let info: QuorumInfo = serde_json::from_value(serde_json::json!({
        "publicKey": "8a1f",
        "version": 1,
        "type": 6
    }))
    .unwrap();
    assert_eq!(info.public_key, "8a1f");
    assert_eq!(info.quorum_type, "6");

    let named: QuorumInfo = serde_json::from_value(serde_json::json!({
        "publicKey": "8a1f",
        "type": "llmq_100_67"
    }))
    .unwrap();
    assert_eq!(named.quorum_type, "llmq_100_67");
    assert_eq!(named.version, 0);
}
