//! Tests for the bridge provider against a simulated device

use std::sync::Arc;
use std::time::Duration;

use pctx_domain::{ContextProvider, Error};
use pctx_providers::context::bridge::{Frame, FrameAssembler, split_message};
use pctx_providers::context::{
    BridgeConfig, BridgeContextProvider, BridgeState, ChannelTransport,
};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const FRAME_SIZE: usize = 64;
const CREDENTIAL: &str = "pairing-secret";

/// Answer one request; `None` leaves it unanswered
fn default_device(method: &str, params: &Value) -> Option<Value> {
    let reply = match method {
        "authenticate" => {
            if params["credential"] == CREDENTIAL {
                json!({ "result": { "authenticated": true } })
            } else {
                json!({ "error": "bad credential" })
            }
        }
        "getStatus" => json!({ "result": {
            "blockHeight": 123_456,
            "blockTime": 1_700_000_000_000_u64,
            "coreChainLockedHeight": 1_090_500,
            "version": "1.4.0",
            "timePerBlock": 5000
        }}),
        "getProposerBlockCount" => json!({ "result": { "count": 5 } }),
        "getBlockProposer" => json!({ "result": null }),
        "getQuorumKeys" => json!({ "error": "unsupported" }),
        _ => json!({ "error": format!("unknown method {method}") }),
    };
    Some(reply)
}

/// Run a device that reassembles requests and frames replies back
fn spawn_device<F>(
    mut from_bridge: mpsc::Receiver<Vec<u8>>,
    to_bridge: mpsc::Sender<Vec<u8>>,
    handler: F,
) -> JoinHandle<()>
where
    F: Fn(&str, &Value) -> Option<Value> + Send + 'static,
{
    tokio::spawn(async move {
        let mut assembler = FrameAssembler::new();
        while let Some(bytes) = from_bridge.recv().await {
            let frame = Frame::decode(&bytes).unwrap();
            let Some((id, message)) = assembler.push(frame).unwrap() else {
                continue;
            };
            let request: Value = serde_json::from_slice(&message).unwrap();
            let method = request["method"].as_str().unwrap_or_default();
            let Some(reply) = handler(method, &request["params"]) else {
                continue;
            };
            let body = serde_json::to_vec(&reply).unwrap();
            for frame in split_message(id, &body, FRAME_SIZE).unwrap() {
                if to_bridge.send(frame.encode()).await.is_err() {
                    return;
                }
            }
        }
    })
}

fn connected_bridge<F>(config: BridgeConfig, handler: F) -> (Arc<BridgeContextProvider>, JoinHandle<()>)
where
    F: Fn(&str, &Value) -> Option<Value> + Send + 'static,
{
    let (transport, from_bridge) = ChannelTransport::pair(FRAME_SIZE, 64);
    let (to_bridge, inbound) = mpsc::channel(64);
    let bridge = Arc::new(BridgeContextProvider::new(Arc::new(transport), config));
    bridge.connect(inbound);
    let device = spawn_device(from_bridge, to_bridge, handler);
    (bridge, device)
}

// ============================================================================
// Session gate
// ============================================================================

/// Test data calls fail immediately before the session is authenticated
#[tokio::test]
async fn test_unauthenticated_calls_fail_immediately() {
    let (transport, _from_bridge) = ChannelTransport::pair(FRAME_SIZE, 4);
    let bridge = BridgeContextProvider::new(Arc::new(transport), BridgeConfig::default());
    assert_eq!(bridge.state(), BridgeState::Disconnected);
    assert!(matches!(
        bridge.get_latest_platform_block_height().await,
        Err(Error::Authentication { .. })
    ));

    let (bridge, _device) = connected_bridge(BridgeConfig::default(), default_device);
    assert_eq!(bridge.state(), BridgeState::Connected);
    assert!(matches!(
        bridge.get_proposer_block_count("p").await,
        Err(Error::Authentication { .. })
    ));
    assert!(!bridge.is_valid().await);
}

/// Test authentication with a valid credential opens the data plane
#[tokio::test]
async fn test_authenticate_and_fetch_status() {
    let (bridge, _device) = connected_bridge(BridgeConfig::default(), default_device);
    bridge.authenticate(CREDENTIAL).await.unwrap();
    assert_eq!(bridge.state(), BridgeState::Authenticated);

    assert_eq!(bridge.get_latest_platform_block_height().await.unwrap(), 123_456);
    assert_eq!(bridge.get_latest_platform_version().await.unwrap(), "1.4.0");
    assert_eq!(
        bridge
            .get_latest_platform_core_chain_locked_height()
            .await
            .unwrap(),
        1_090_500
    );
    assert!(bridge.is_valid().await);
}

/// Test a rejected credential leaves the session connected
#[tokio::test]
async fn test_rejected_credential() {
    let (bridge, _device) = connected_bridge(BridgeConfig::default(), default_device);
    let err = bridge.authenticate("wrong").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
    assert_eq!(bridge.state(), BridgeState::Connected);
}

/// Test authenticating without a link fails
#[tokio::test]
async fn test_authenticate_requires_connection() {
    let (transport, _from_bridge) = ChannelTransport::pair(FRAME_SIZE, 4);
    let bridge = BridgeContextProvider::new(Arc::new(transport), BridgeConfig::default());
    assert!(bridge.authenticate(CREDENTIAL).await.is_err());
    assert_eq!(bridge.state(), BridgeState::Disconnected);
}

// ============================================================================
// Auxiliary data
// ============================================================================

/// Test optional methods resolve to values or None
#[tokio::test]
async fn test_auxiliary_methods() {
    let (bridge, _device) = connected_bridge(BridgeConfig::default(), default_device);
    bridge.authenticate(CREDENTIAL).await.unwrap();

    assert_eq!(bridge.get_proposer_block_count("p").await.unwrap(), Some(5));
    assert_eq!(bridge.get_block_proposer(10).await.unwrap(), None);
    assert_eq!(bridge.get_quorum_keys().await.unwrap(), None);
}

// ============================================================================
// Timeouts and disconnects
// ============================================================================

/// Test an unanswered request times out
#[tokio::test]
async fn test_request_timeout() {
    let config = BridgeConfig {
        request_timeout: Duration::from_millis(100),
        ..BridgeConfig::default()
    };
    let (bridge, _device) = connected_bridge(config, |method, params| {
        if method == "getStatus" {
            None
        } else {
            default_device(method, params)
        }
    });
    bridge.authenticate(CREDENTIAL).await.unwrap();

    let err = bridge.get_latest_platform_block_height().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
}

/// Test disconnecting fails in-flight requests and closes the gate
#[tokio::test]
async fn test_disconnect_fails_pending_requests() {
    let (bridge, _device) = connected_bridge(BridgeConfig::default(), |method, params| {
        if method == "getStatus" {
            None
        } else {
            default_device(method, params)
        }
    });
    bridge.authenticate(CREDENTIAL).await.unwrap();

    let in_flight = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move { bridge.get_latest_platform_block_height().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    bridge.disconnect();

    let err = in_flight.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
    assert_eq!(bridge.state(), BridgeState::Disconnected);
    assert!(matches!(
        bridge.get_latest_platform_block_height().await,
        Err(Error::Authentication { .. })
    ));
}

/// Test the session drops to disconnected when the peer closes the link
#[tokio::test]
async fn test_peer_close_disconnects() {
    let (bridge, device) = connected_bridge(BridgeConfig::default(), default_device);
    bridge.authenticate(CREDENTIAL).await.unwrap();
    bridge.get_latest_platform_block_height().await.unwrap();

    device.abort();
    for _ in 0..50 {
        if bridge.state() == BridgeState::Disconnected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(bridge.state(), BridgeState::Disconnected);
}

/// Test reconnecting requires authenticating again
#[tokio::test]
async fn test_reconnect_drops_authentication() {
    let (bridge, _device) = connected_bridge(BridgeConfig::default(), default_device);
    bridge.authenticate(CREDENTIAL).await.unwrap();

    let (_to_bridge, inbound) = mpsc::channel(4);
    bridge.connect(inbound);
    assert_eq!(bridge.state(), BridgeState::Connected);
}
