//! Priority Context Provider Tests

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use pctx_domain::{
    Capability, ContextOperation, ContextProvider, Error, EventBusProvider,
    ExtendedContextProvider, ProviderEvent,
};
use pctx_infrastructure::priority::{PriorityConfig, PriorityContextProvider, ProviderEntry};
use pctx_providers::context::{StatusServiceConfig, StatusServiceContextProvider};
use pctx_providers::events::TokioEventBusProvider;
use pctx_providers::retry::RetryPolicy;

use crate::support::{ScriptedProvider, next_events};

fn uncached() -> PriorityConfig {
    PriorityConfig {
        cache_results: false,
        ..PriorityConfig::default()
    }
}

fn entry(priority: i32, provider: &Arc<ScriptedProvider>) -> ProviderEntry {
    ProviderEntry::named(priority, Arc::clone(provider))
}

// ============================================================================
// Ordering and fallback
// ============================================================================

/// Test only the highest-priority healthy provider is reached
#[tokio::test]
async fn test_highest_priority_provider_answers() {
    let low = ScriptedProvider::healthy("low", 10).shared();
    let mid = ScriptedProvider::healthy("mid", 50).shared();
    let high = ScriptedProvider::healthy("high", 100).shared();

    // Registration order does not matter
    let priority = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [entry(10, &low), entry(100, &high), entry(50, &mid)],
    )
    .unwrap();

    for _ in 0..3 {
        assert_eq!(priority.get_latest_platform_block_height().await.unwrap(), 100);
    }
    assert_eq!(high.calls(), 3);
    assert_eq!(mid.calls(), 0);
    assert_eq!(low.calls(), 0);
}

/// Test a failing provider falls back to the next one with ordered events
#[tokio::test]
async fn test_fallback_emits_error_fallback_used() {
    let a = ScriptedProvider::failing("A").shared();
    let b = ScriptedProvider::healthy("B", 123_456).shared();
    let bus = TokioEventBusProvider::new_shared();
    let mut events = bus.subscribe_events().await.unwrap();

    let priority =
        PriorityContextProvider::with_providers(uncached(), bus.clone(), [entry(100, &a), entry(50, &b)])
            .unwrap();

    assert_eq!(
        priority.get_latest_platform_block_height().await.unwrap(),
        123_456
    );

    let received = next_events(&mut events, 3).await;
    assert!(matches!(
        &received[0],
        ProviderEvent::ProviderError { provider, .. } if provider == "A"
    ));
    assert_eq!(
        received[1],
        ProviderEvent::ProviderFallback {
            from: "A".to_string(),
            to: "B".to_string()
        }
    );
    assert_eq!(
        received[2],
        ProviderEvent::ProviderUsed {
            provider: "B".to_string(),
            operation: ContextOperation::LatestPlatformBlockHeight
        }
    );
}

/// Test exhaustion surfaces every provider failure
#[tokio::test]
async fn test_all_failed() {
    let a = ScriptedProvider::failing("A").shared();
    let b = ScriptedProvider::failing("B").shared();
    let bus = TokioEventBusProvider::new_shared();
    let mut events = bus.subscribe_events().await.unwrap();

    let priority =
        PriorityContextProvider::with_providers(uncached(), bus.clone(), [entry(100, &a), entry(50, &b)])
            .unwrap();

    let err = priority.get_latest_platform_version().await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("getLatestPlatformVersion"));
    assert!(message.contains("A: Network error: A failed call 1"));
    assert!(message.contains("B: Network error: B failed call 1"));
    match err {
        Error::AllProvidersFailed { failures, .. } => assert_eq!(failures.len(), 2),
        other => panic!("Expected AllProvidersFailed, got {other:?}"),
    }

    let received = next_events(&mut events, 4).await;
    let names: Vec<_> = received.iter().map(ProviderEvent::name).collect();
    assert_eq!(
        names,
        vec!["provider:error", "provider:fallback", "provider:error", "all:failed"]
    );
    match &received[3] {
        ProviderEvent::AllFailed { operation, errors } => {
            assert_eq!(*operation, ContextOperation::LatestPlatformVersion);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("Expected AllFailed, got {other:?}"),
    }
}

/// Test an unavailable provider is skipped without being called
#[tokio::test]
async fn test_unavailable_provider_is_skipped() {
    let a = ScriptedProvider::healthy("A", 1).unavailable().shared();
    let b = ScriptedProvider::healthy("B", 2).shared();
    let priority = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [entry(100, &a), entry(50, &b)],
    )
    .unwrap();

    assert_eq!(priority.get_latest_platform_block_height().await.unwrap(), 2);
    assert_eq!(a.calls(), 0);

    let metrics = priority.get_metrics();
    assert_eq!(metrics["A"].error_count, 1);
    assert!(metrics["A"].last_error.as_deref().unwrap().contains("unavailable"));
}

/// Test a failing availability check keeps the backend's own reason
#[tokio::test]
async fn test_unavailable_status_service_reports_backend_reason() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/status")
        .with_status(503)
        .with_body("backend down for maintenance")
        .create_async()
        .await;
    let mut config = StatusServiceConfig::new(server.url());
    config.timeout = Duration::from_secs(2);
    config.retry = RetryPolicy::no_retry();
    let status = Arc::new(StatusServiceContextProvider::new(config).unwrap());

    let priority = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [ProviderEntry::named(100, status)],
    )
    .unwrap();

    let err = priority.get_latest_platform_block_height().await.unwrap_err();
    assert!(matches!(err, Error::AllProvidersFailed { .. }));
    assert!(err.to_string().contains("backend down for maintenance"));

    let metrics = priority.get_metrics();
    let last_error = metrics["status-service"].last_error.as_deref().unwrap();
    assert!(last_error.contains("backend down for maintenance"));
}

// ============================================================================
// Capability routing
// ============================================================================

/// Test operations only reach providers declaring the needed capability
#[tokio::test]
async fn test_capability_routing() {
    let state_only = ScriptedProvider::healthy("state", 1)
        .with_capabilities(&[Capability::PlatformState])
        .shared();
    let plain = ScriptedProvider::healthy("plain", 2).plain().shared();
    let priority = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [entry(100, &state_only), ProviderEntry::new("plain", 10, plain.clone())],
    )
    .unwrap();

    let proposer = priority.get_block_proposer(7).await.unwrap();
    assert_eq!(proposer.as_deref(), Some("plain-proposer-7"));
    assert_eq!(state_only.calls(), 0);
    assert_eq!(plain.calls(), 1);
}

/// Test an operation nobody offers is not supported
#[tokio::test]
async fn test_no_candidates() {
    let a = ScriptedProvider::healthy("A", 1).shared();
    let bus = TokioEventBusProvider::new_shared();
    let mut events = bus.subscribe_events().await.unwrap();
    let priority =
        PriorityContextProvider::with_providers(uncached(), bus.clone(), [entry(100, &a)]).unwrap();

    let err = priority.get_quorum_keys().await.unwrap_err();
    assert!(matches!(err, Error::NotSupported { .. }));

    let received = next_events(&mut events, 1).await;
    assert_eq!(
        received[0],
        ProviderEvent::AllFailed {
            operation: ContextOperation::QuorumKeys,
            errors: BTreeMap::new()
        }
    );
}

/// Test a nullable answer is a success and stops the fallback
#[tokio::test]
async fn test_nullable_answer_is_success() {
    let a = ScriptedProvider::healthy("A", 1).shared();
    let b = ScriptedProvider::healthy("B", 2).shared();
    let priority = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [entry(100, &a), entry(50, &b)],
    )
    .unwrap();

    assert_eq!(priority.get_proposer_block_count("p").await.unwrap(), None);
    assert_eq!(b.calls(), 0);
}

// ============================================================================
// Result cache
// ============================================================================

/// Test cached results skip providers until expiry or clear
#[tokio::test]
async fn test_result_cache_window_and_clear() {
    let a = ScriptedProvider::healthy("A", 42).shared();
    let config = PriorityConfig {
        cache_ttl: Duration::from_millis(50),
        ..PriorityConfig::default()
    };
    let priority =
        PriorityContextProvider::with_providers(config, TokioEventBusProvider::new_shared(), [entry(1, &a)])
            .unwrap();

    priority.get_latest_platform_block_height().await.unwrap();
    priority.get_latest_platform_block_height().await.unwrap();
    assert_eq!(a.calls(), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;
    priority.get_latest_platform_block_height().await.unwrap();
    assert_eq!(a.calls(), 2);

    priority.clear_cache();
    priority.get_latest_platform_block_height().await.unwrap();
    assert_eq!(a.calls(), 3);
}

/// Test cache keys include the operation argument
#[tokio::test]
async fn test_result_cache_is_keyed_by_argument() {
    let a = ScriptedProvider::healthy("A", 1).shared();
    let priority = PriorityContextProvider::with_providers(
        PriorityConfig::default(),
        TokioEventBusProvider::new_shared(),
        [entry(1, &a)],
    )
    .unwrap();

    assert_eq!(
        priority.get_block_proposer(1).await.unwrap().as_deref(),
        Some("A-proposer-1")
    );
    assert_eq!(
        priority.get_block_proposer(2).await.unwrap().as_deref(),
        Some("A-proposer-2")
    );
    priority.get_block_proposer(1).await.unwrap();
    assert_eq!(a.calls(), 2);
}

// ============================================================================
// Metrics
// ============================================================================

/// Test metrics accumulate over successes and failures
#[tokio::test]
async fn test_metrics_accumulate() {
    let a = ScriptedProvider::healthy("A", 9)
        .scripted(&[true, true, false, true, false])
        .with_delay(Duration::from_millis(5))
        .shared();
    let priority = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [entry(1, &a)],
    )
    .unwrap();

    for _ in 0..5 {
        let _ = priority.get_latest_platform_block_height().await;
    }

    let metrics = priority.get_metrics()["A"].clone();
    assert_eq!(metrics.success_count, 3);
    assert_eq!(metrics.error_count, 2);
    assert!(metrics.average_response_time_ms >= 5.0);
    assert!(metrics.last_error.as_deref().unwrap().contains("failed call 5"));
    assert!(metrics.last_success_time.is_some());
}

/// Test metric snapshots are copies
#[tokio::test]
async fn test_metrics_snapshot_is_detached() {
    let a = ScriptedProvider::healthy("A", 1).shared();
    let priority =
        PriorityContextProvider::with_providers(uncached(), TokioEventBusProvider::new_shared(), [entry(1, &a)])
            .unwrap();

    let mut snapshot = priority.get_metrics();
    assert_eq!(snapshot["A"].success_count, 0);
    snapshot.get_mut("A").unwrap().success_count = 99;
    assert_eq!(priority.get_metrics()["A"].success_count, 0);
}

// ============================================================================
// Membership
// ============================================================================

/// Test adding and removing providers keeps priority order
#[tokio::test]
async fn test_add_and_remove_providers() {
    let a = ScriptedProvider::healthy("A", 1).shared();
    let b = ScriptedProvider::healthy("B", 2).shared();
    let c = ScriptedProvider::healthy("C", 3).shared();
    let priority = PriorityContextProvider::new(uncached());

    priority.add_provider(entry(10, &a)).unwrap();
    priority.add_provider(entry(10, &b)).unwrap();
    priority.add_provider(entry(50, &c)).unwrap();
    let names: Vec<_> = priority.providers().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["C", "A", "B"]);
    assert_eq!(priority.get_latest_platform_block_height().await.unwrap(), 3);

    assert!(priority.add_provider(entry(99, &a)).is_err());

    assert!(priority.remove_provider("C"));
    assert!(!priority.remove_provider("C"));
    assert!(!priority.get_metrics().contains_key("C"));
    assert_eq!(priority.get_latest_platform_block_height().await.unwrap(), 1);
}

/// Test the active provider is the first usable one
#[tokio::test]
async fn test_active_provider() {
    let down = ScriptedProvider::healthy("down", 1).unavailable().shared();
    let plain = ScriptedProvider::healthy("plain", 2).plain().shared();
    let priority = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [entry(100, &down), ProviderEntry::new("plain", 50, plain.clone())],
    )
    .unwrap();

    let active = priority.get_active_provider().await.unwrap();
    assert_eq!(active.name, "plain");
    assert_eq!(active.capabilities, Capability::baseline());
    assert!(priority.is_valid().await);

    let empty = PriorityContextProvider::new(uncached());
    assert!(empty.get_active_provider().await.is_none());
    assert!(!empty.is_valid().await);
}

/// Test a priority provider can be nested as a source
#[tokio::test]
async fn test_nested_priority_provider() {
    let a = ScriptedProvider::failing("A").shared();
    let b = ScriptedProvider::healthy("B", 5).shared();
    let inner = Arc::new(
        PriorityContextProvider::with_providers(
            PriorityConfig {
                name: "inner".to_string(),
                ..uncached()
            },
            TokioEventBusProvider::new_shared(),
            [entry(2, &a), entry(1, &b)],
        )
        .unwrap(),
    );
    assert_eq!(inner.provider_name(), "inner");
    assert_eq!(inner.capabilities(), Capability::baseline());

    let outer = PriorityContextProvider::with_providers(
        uncached(),
        TokioEventBusProvider::new_shared(),
        [ProviderEntry::named(1, inner)],
    )
    .unwrap();
    assert_eq!(outer.get_latest_platform_block_height().await.unwrap(), 5);
}
