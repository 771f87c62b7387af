//! Queries against a selected Hive-Engine node.
//!
//! Once a node URL has been picked, contract tables are read with a JSON-RPC
//! `find` posted to `<node>/contracts`.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 10;

/// Row of the `tokens` contract's `tokens` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    #[serde(rename = "_id")]
    pub id: u64,
    pub issuer: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub metadata: String,
    pub precision: u32,
    pub max_supply: String,
    pub supply: String,
    pub circulating_supply: String,
    #[serde(default)]
    pub staking_enabled: bool,
    #[serde(default)]
    pub unstaking_cooldown: u64,
    #[serde(default)]
    pub delegation_enabled: bool,
    #[serde(default)]
    pub undelegation_cooldown: u64,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// JSON-RPC client for one Hive-Engine node
#[derive(Debug, Clone)]
pub struct EngineClient {
    client: reqwest::Client,
    node: String,
}

impl EngineClient {
    pub fn new(node: impl Into<String>) -> Self {
        Self::with_timeout(node, Duration::from_secs(DEFAULT_ENGINE_TIMEOUT_SECS))
    }

    pub fn with_timeout(node: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            node: node.into(),
        }
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn contracts_url(&self) -> String {
        format!("{}/contracts", self.node.trim_end_matches('/'))
    }

    /// Run a `find` against a contract table
    pub async fn find(
        &self,
        contract: &str,
        table: &str,
        query: Value,
        limit: u32,
    ) -> Result<Vec<Value>, EngineError> {
        let response = self
            .client
            .post(self.contracts_url())
            .json(&find_request(contract, table, query, limit))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::Status(response.status().as_u16()));
        }

        let body: FindResponse = response.json().await?;
        find_rows(body)
    }

    /// Token definition for `symbol`, if the token exists
    pub async fn token_info(&self, symbol: &str) -> Result<Option<TokenInfo>, EngineError> {
        let rows = self
            .find("tokens", "tokens", json!({ "symbol": symbol }), 1)
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }
}

fn find_request(contract: &str, table: &str, query: Value, limit: u32) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "find",
        "params": {
            "contract": contract,
            "table": table,
            "query": query,
            "limit": limit
        }
    })
}

fn find_rows(body: FindResponse) -> Result<Vec<Value>, EngineError> {
    if let Some(err) = body.error {
        return Err(EngineError::Rpc(err.to_string()));
    }

    match body.result {
        Some(Value::Array(rows)) => Ok(rows),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(EngineError::Rpc(format!("unexpected result: {}", other))),
    }
}
