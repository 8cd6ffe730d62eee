//! Registry Response Parsing
//!
//! Registry responses look like
//! `{ success, data: [ { status, isValid, extraPayload: { platformNodeID, platformP2PPort, platformHTTPPort, service } } ], message }`.
//! Only enabled, valid records carrying every platform field qualify. Records
//! without a usable service address are expected noise and are skipped.

use serde_json::Value;
use tracing::debug;

use pctx_domain::error::{Error, Result};
use pctx_domain::value_objects::Network;

use crate::utils::JsonExt;

const PLATFORM_FIELDS: [&str; 3] = ["platformNodeID", "platformP2PPort", "platformHTTPPort"];

/// Parse `host:port`, rewriting the network's P2P port to its gateway port
///
/// Returns `None` for addresses without a host or with an unparseable port.
pub fn normalize_service_address(service: &str, network: Network) -> Option<String> {
    let (host, port) = service.trim().rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    let port: u16 = port.parse().ok()?;
    let port = if port == network.default_p2p_port() {
        network.gateway_port()
    } else {
        port
    };
    Some(format!("{host}:{port}"))
}

fn is_platform_node(record: &Value) -> bool {
    let enabled = record.opt_str("status") == Some("ENABLED");
    let valid = record.opt_bool("isValid") == Some(true);
    let platform = record.get("extraPayload").is_some_and(|extra| {
        PLATFORM_FIELDS
            .iter()
            .all(|field| extra.get(field).is_some_and(|v| !v.is_null()))
    });
    enabled && valid && platform
}

fn service_of(record: &Value) -> Option<&str> {
    record
        .get("extraPayload")
        .and_then(|extra| extra.opt_str("service"))
        .or_else(|| record.opt_str("service"))
}

/// Turn a registry response into normalized node addresses
///
/// A response that is not `success: true` with an array `data` is an
/// `Error::InvalidResponse`; a well-formed response may yield an empty list.
/// Duplicate addresses are kept once, in registry order.
pub fn parse_registry_response(body: &Value, network: Network) -> Result<Vec<String>> {
    if body.opt_bool("success") != Some(true) {
        let message = body.opt_str("message").unwrap_or("no message");
        return Err(Error::invalid_response(format!(
            "registry reported failure: {message}"
        )));
    }
    let Some(records) = body.get("data").and_then(Value::as_array) else {
        return Err(Error::invalid_response("registry `data` is not an array"));
    };

    let mut addresses: Vec<String> = Vec::with_capacity(records.len());
    for record in records.iter().filter(|r| is_platform_node(r)) {
        match service_of(record).and_then(|s| normalize_service_address(s, network)) {
            Some(address) if !addresses.contains(&address) => addresses.push(address),
            Some(_) => {}
            None => debug!("skipping registry record without a usable service address"),
        }
    }
    Ok(addresses)
}
