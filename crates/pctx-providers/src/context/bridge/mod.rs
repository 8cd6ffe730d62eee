//! Bridge Context Provider
//!
//! Reaches a paired companion device over a short-range link. Requests are
//! JSON messages split into frames (see [`frame`]) and matched to responses
//! by a per-request correlation id.
//!
//! The session moves through three states:
//!
//! ```text
//! Disconnected --connect--> Connected --authenticate--> Authenticated
//!      ^                        |                             |
//!      +-------disconnect-------+-------------disconnect------+
//! ```
//!
//! Data-plane calls made outside `Authenticated` fail immediately with
//! `Error::Authentication`. Disconnecting fails every in-flight request and
//! clears the provider's caches.

pub mod frame;
pub mod transport;

pub use frame::{Frame, FrameAssembler, split_message};
pub use transport::{BridgeTransport, ChannelTransport};

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pctx_domain::constants::{
    DEFAULT_CACHE_CAPACITY, PLATFORM_STATE_CACHE_TTL_MS, QUORUM_KEYS_CACHE_TTL_MS,
};
use pctx_domain::error::{Error, Result};
use pctx_domain::ports::{ContextProvider, ExtendedContextProvider};
use pctx_domain::value_objects::{
    Capability, CapabilitySet, ContextOperation, PlatformStatus, QuorumMap,
};

use crate::cache::JsonCache;
use crate::constants::{BRIDGE_PROVIDER_NAME, BRIDGE_REQUEST_TIMEOUT_MS};
use crate::context::status::{
    StatusCache, as_count, as_proposer, optional_field, parse_platform_status,
};

/// Session state of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeState {
    /// No link
    Disconnected,
    /// Link up, not yet authenticated
    Connected,
    /// Link up and authenticated; data-plane calls allowed
    Authenticated,
}

/// Bridge provider settings
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Deadline for one request, sending included
    pub request_timeout: Duration,
    /// Freshness window for platform-state and proposer values
    pub cache_ttl: Duration,
    /// Freshness window for quorum keys
    pub quorum_cache_ttl: Duration,
    /// Maximum cached entries
    pub cache_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(BRIDGE_REQUEST_TIMEOUT_MS),
            cache_ttl: Duration::from_millis(PLATFORM_STATE_CACHE_TTL_MS),
            quorum_cache_ttl: Duration::from_millis(QUORUM_KEYS_CACHE_TTL_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Request message sent to the device
#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    id: Uuid,
    method: &'a str,
    params: Value,
}

/// Response message received from the device
#[derive(Debug, Deserialize)]
struct BridgeResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug)]
struct Session {
    state: BridgeState,
    generation: u64,
    pump: Option<JoinHandle<()>>,
}

/// State shared between the provider and its inbound pump task
struct BridgeShared {
    session: Mutex<Session>,
    pending: DashMap<Uuid, oneshot::Sender<Result<Value>>>,
    status: StatusCache,
    aux: JsonCache,
    quorums: JsonCache,
}

impl BridgeShared {
    fn session(&self) -> std::sync::MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, id: Uuid, message: &[u8]) {
        let outcome = match serde_json::from_slice::<BridgeResponse>(message) {
            Ok(BridgeResponse {
                error: Some(error), ..
            }) => Err(Error::remote(error)),
            Ok(BridgeResponse { result, .. }) => Ok(result),
            Err(e) => Err(Error::invalid_response(format!(
                "malformed bridge response: {e}"
            ))),
        };
        match self.pending.remove(&id) {
            Some((_, waiter)) => {
                // The requester may have timed out in the meantime.
                let _ = waiter.send(outcome);
            }
            None => debug!(%id, "dropping unsolicited bridge response"),
        }
    }

    /// Fail in-flight requests and drop cached data
    fn invalidate(&self, reason: &str) {
        let ids: Vec<Uuid> = self.pending.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, waiter)) = self.pending.remove(&id) {
                let _ = waiter.send(Err(Error::network(reason.to_string())));
            }
        }
        self.status.clear();
        self.aux.clear();
        self.quorums.clear();
    }
}

async fn pump_inbound(
    shared: Arc<BridgeShared>,
    mut inbound: mpsc::Receiver<Vec<u8>>,
    generation: u64,
) {
    let mut assembler = FrameAssembler::new();
    while let Some(bytes) = inbound.recv().await {
        let frame = match Frame::decode(&bytes) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "discarding undecodable bridge frame");
                continue;
            }
        };
        match assembler.push(frame) {
            Ok(Some((id, message))) => shared.complete(id, &message),
            Ok(None) => assembler.retain(|id| shared.pending.contains_key(id)),
            Err(e) => warn!(error = %e, "discarding inconsistent bridge frame"),
        }
    }

    let mut session = shared.session();
    if session.generation == generation && session.state != BridgeState::Disconnected {
        info!("bridge link closed by peer");
        session.state = BridgeState::Disconnected;
        session.pump = None;
        drop(session);
        shared.invalidate("bridge link closed");
    }
}

/// Context provider backed by a paired device
pub struct BridgeContextProvider {
    transport: Arc<dyn BridgeTransport>,
    request_timeout: Duration,
    shared: Arc<BridgeShared>,
}

impl BridgeContextProvider {
    /// Create a disconnected bridge over `transport`
    pub fn new(transport: Arc<dyn BridgeTransport>, config: BridgeConfig) -> Self {
        Self {
            transport,
            request_timeout: config.request_timeout,
            shared: Arc::new(BridgeShared {
                session: Mutex::new(Session {
                    state: BridgeState::Disconnected,
                    generation: 0,
                    pump: None,
                }),
                pending: DashMap::new(),
                status: StatusCache::new(config.cache_ttl, config.cache_capacity),
                aux: JsonCache::new(config.cache_ttl, config.cache_capacity),
                quorums: JsonCache::new(config.quorum_cache_ttl, 1),
            }),
        }
    }

    /// Current session state
    pub fn state(&self) -> BridgeState {
        self.shared.session().state
    }

    /// Attach the inbound frame stream and mark the link connected
    ///
    /// Must be called from within a tokio runtime. Reconnecting replaces the
    /// previous session and drops its authentication.
    pub fn connect(&self, inbound: mpsc::Receiver<Vec<u8>>) {
        let mut session = self.shared.session();
        if let Some(previous) = session.pump.take() {
            previous.abort();
        }
        session.generation += 1;
        session.state = BridgeState::Connected;
        session.pump = Some(tokio::spawn(pump_inbound(
            Arc::clone(&self.shared),
            inbound,
            session.generation,
        )));
        info!(generation = session.generation, "bridge connected");
    }

    /// Authenticate the session with `credential`
    pub async fn authenticate(&self, credential: &str) -> Result<()> {
        let generation = {
            let session = self.shared.session();
            if session.state == BridgeState::Disconnected {
                return Err(Error::network("bridge is not connected"));
            }
            session.generation
        };

        let result = self
            .call("authenticate", json!({ "credential": credential }))
            .await
            .map_err(|e| match e {
                Error::Remote { message } => Error::authentication(message),
                other => other,
            })?;
        let accepted = result
            .get("authenticated")
            .and_then(Value::as_bool)
            .or_else(|| result.as_bool())
            .unwrap_or(false);
        if !accepted {
            return Err(Error::authentication("credential rejected by device"));
        }

        let mut session = self.shared.session();
        if session.generation != generation || session.state == BridgeState::Disconnected {
            return Err(Error::network("bridge session changed during authentication"));
        }
        session.state = BridgeState::Authenticated;
        info!("bridge authenticated");
        Ok(())
    }

    /// Close the session, failing in-flight requests and clearing caches
    pub fn disconnect(&self) {
        let mut session = self.shared.session();
        if let Some(pump) = session.pump.take() {
            pump.abort();
        }
        session.generation += 1;
        session.state = BridgeState::Disconnected;
        drop(session);
        self.shared.invalidate("bridge disconnected");
        info!("bridge disconnected");
    }

    /// Send one request and wait for its response
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = Uuid::new_v4();
        let message = serde_json::to_vec(&BridgeRequest { id, method, params })?;
        let frames = split_message(id, &message, self.transport.max_frame_size())?;

        let (tx, rx) = oneshot::channel();
        self.shared.pending.insert(id, tx);

        let exchange = async {
            for frame in frames {
                self.transport.send_frame(frame.encode()).await?;
            }
            rx.await
                .map_err(|_| Error::network("bridge session closed before response"))?
        };

        let outcome = match tokio::time::timeout(self.request_timeout, exchange).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::timeout(format!("bridge {method} request"))),
        };
        self.shared.pending.remove(&id);
        outcome
    }

    /// Send a data-plane request; requires an authenticated session
    async fn data_request(&self, method: &str, params: Value) -> Result<Value> {
        if self.state() != BridgeState::Authenticated {
            return Err(Error::authentication("bridge session is not authenticated"));
        }
        self.call(method, params).await
    }

    /// Data-plane request whose failure means "not offered" unless it is a
    /// gate error or malformed data
    async fn optional_request(&self, method: &str, params: Value) -> Result<Option<Value>> {
        match self.data_request(method, params).await {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e @ (Error::Authentication { .. } | Error::InvalidResponse { .. })) => Err(e),
            Err(e) => {
                debug!(method, error = %e, "optional bridge request unavailable");
                Ok(None)
            }
        }
    }

    async fn fetch_status(&self) -> Result<PlatformStatus> {
        let result = self.data_request("getStatus", Value::Null).await?;
        parse_platform_status(&result)
    }

    async fn cached_status<T: serde::de::DeserializeOwned>(
        &self,
        operation: ContextOperation,
    ) -> Result<T> {
        if self.state() != BridgeState::Authenticated {
            return Err(Error::authentication("bridge session is not authenticated"));
        }
        self.shared
            .status
            .get_or_fetch(operation, || self.fetch_status())
            .await
    }
}

#[async_trait]
impl ContextProvider for BridgeContextProvider {
    async fn get_latest_platform_block_height(&self) -> Result<u64> {
        self.cached_status(ContextOperation::LatestPlatformBlockHeight)
            .await
    }

    async fn get_latest_platform_block_time(&self) -> Result<u64> {
        self.cached_status(ContextOperation::LatestPlatformBlockTime)
            .await
    }

    async fn get_latest_platform_core_chain_locked_height(&self) -> Result<u32> {
        self.cached_status(ContextOperation::LatestPlatformCoreChainLockedHeight)
            .await
    }

    async fn get_latest_platform_version(&self) -> Result<String> {
        self.cached_status(ContextOperation::LatestPlatformVersion)
            .await
    }

    async fn get_proposer_block_count(&self, proposer_id: &str) -> Result<Option<u64>> {
        let key = ContextOperation::ProposerBlockCount.cache_key(Some(proposer_id));
        if let Some(count) = self.shared.aux.get_as::<u64>(&key) {
            return Ok(Some(count));
        }

        let result = self
            .optional_request("getProposerBlockCount", json!({ "proposerId": proposer_id }))
            .await?;
        let count = match &result {
            Some(bare @ (Value::Number(_) | Value::String(_))) => as_count(bare)
                .map(Some)
                .ok_or_else(|| Error::invalid_response(format!("bad block count: {bare}")))?,
            other => optional_field(other.as_ref(), "count", as_count)?,
        };
        if let Some(count) = count {
            self.shared.aux.set_as(key, &count)?;
        }
        Ok(count)
    }

    async fn get_time_per_block_millis(&self) -> Result<u64> {
        self.cached_status(ContextOperation::TimePerBlockMillis)
            .await
    }

    async fn get_block_proposer(&self, height: u64) -> Result<Option<String>> {
        let key = ContextOperation::BlockProposer.cache_key(Some(&height.to_string()));
        if let Some(proposer) = self.shared.aux.get_as::<String>(&key) {
            return Ok(Some(proposer));
        }

        let result = self
            .optional_request("getBlockProposer", json!({ "height": height }))
            .await?;
        let proposer = match &result {
            Some(Value::String(bare)) => Some(bare.clone()),
            other => optional_field(other.as_ref(), "proposer", as_proposer)?,
        };
        if let Some(proposer) = &proposer {
            self.shared.aux.set_as(key, proposer)?;
        }
        Ok(proposer)
    }

    async fn get_quorum_keys(&self) -> Result<Option<QuorumMap>> {
        let key = ContextOperation::QuorumKeys.cache_key(None);
        if let Some(quorums) = self.shared.quorums.get_as::<QuorumMap>(&key) {
            return Ok(Some(quorums));
        }

        let Some(result) = self.optional_request("getQuorumKeys", Value::Null).await? else {
            return Ok(None);
        };
        let quorums: QuorumMap = serde_json::from_value(result)
            .map_err(|e| Error::invalid_response(format!("malformed quorum map: {e}")))?;
        self.shared.quorums.set_as(key, &quorums)?;
        Ok(Some(quorums))
    }

    async fn is_valid(&self) -> bool {
        self.state() == BridgeState::Authenticated
    }

    fn as_extended(&self) -> Option<&dyn ExtendedContextProvider> {
        Some(self)
    }
}

#[async_trait]
impl ExtendedContextProvider for BridgeContextProvider {
    fn provider_name(&self) -> &str {
        BRIDGE_PROVIDER_NAME
    }

    fn capabilities(&self) -> CapabilitySet {
        [
            Capability::PlatformState,
            Capability::BlockProposer,
            Capability::QuorumKeys,
        ]
        .into_iter()
        .collect()
    }

    async fn is_available(&self) -> bool {
        self.state() == BridgeState::Authenticated
    }
}

impl Drop for BridgeContextProvider {
    fn drop(&mut self) {
        if let Some(pump) = self.shared.session().pump.take() {
            pump.abort();
        }
    }
}
