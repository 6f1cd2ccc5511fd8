//! HTTP client for the farm API.
//!
//! Speaks JSON-RPC 2.0 to the HTTP transport and decodes results into the
//! shared types in [`types`].

pub mod types;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use crate::api::Method;
use crate::rpc::RpcError;
use types::{Stat1, StatHr};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3333";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        ClientError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Farm API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    next_id: AtomicU64,
}

impl Client {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Fetch the legacy nine-field stats.
    pub async fn get_stat1(&self) -> Result<Stat1, ClientError> {
        self.call(Method::GetStat1).await
    }

    /// Fetch the keyed stats.
    pub async fn get_stat_hr(&self) -> Result<StatHr, ClientError> {
        self.call(Method::GetStatHr).await
    }

    /// Ask the farm to restart. Fails with "method not found" on a readonly
    /// server.
    pub async fn restart(&self) -> Result<(), ClientError> {
        self.call::<Value>(Method::Restart).await.map(|_| ())
    }

    /// Send a reboot request. The server acknowledges it but does nothing.
    pub async fn reboot(&self) -> Result<(), ClientError> {
        self.call::<Value>(Method::Reboot).await.map(|_| ())
    }

    async fn call<T: DeserializeOwned>(&self, method: Method) -> Result<T, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "method": method.name(),
            "params": {},
            "id": id,
        });

        let response: RpcResponse = self
            .http
            .post(&self.base_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response {
            RpcResponse {
                error: Some(err), ..
            } => Err(err.into()),
            RpcResponse {
                result: Some(result),
                ..
            } => serde_json::from_value(result).map_err(|e| ClientError::Malformed(e.to_string())),
            RpcResponse { .. } => Err(ClientError::Malformed(
                "response has neither result nor error".into(),
            )),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
