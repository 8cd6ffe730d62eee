//! HTTP Response Utilities
//!
//! Helper functions for processing HTTP responses from status backends.

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;

use pctx_domain::error::{Error, Result};

use crate::constants::CONTENT_TYPE_JSON;
use crate::http::classify_request_error;

/// Utilities for processing HTTP responses
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check response status and parse JSON
    ///
    /// Non-success statuses become `Error::Http` carrying the status code, so
    /// callers can tell a missing endpoint (404) from a server failure (5xx).
    /// A success status with a body that is not JSON is an
    /// `Error::InvalidResponse`.
    pub async fn check_and_parse(response: Response, provider_name: &str) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let code = status.as_u16();

            let message = match code {
                401 | 403 => format!("{provider_name} authentication failed: {error_text}"),
                404 => format!("{provider_name} endpoint not found"),
                429 => format!("{provider_name} rate limit exceeded: {error_text}"),
                500..=599 => format!("{provider_name} server error: {error_text}"),
                _ => format!("{provider_name} request failed: {error_text}"),
            };
            return Err(Error::http(code, message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(provider_name, e))?;
        serde_json::from_str(&body).map_err(|e| {
            Error::invalid_response(format!("{provider_name} returned non-JSON body: {e}"))
        })
    }

    /// Issue a `GET` expecting JSON and parse the body
    pub async fn get_json(
        client: &Client,
        url: &str,
        timeout: Duration,
        provider_name: &str,
    ) -> Result<Value> {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, CONTENT_TYPE_JSON)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(provider_name, e))?;

        Self::check_and_parse(response, provider_name).await
    }
}
