//! Hive account lookup over JSON-RPC.
//!
//! Thin adapter behind [`AccountLookup`]: one `condenser_api.get_accounts`
//! call per configured API endpoint, in order, stopping at the first endpoint
//! that answers. No backoff and no repeated attempts against one endpoint.

use crate::error::LookupError;
use crate::lookup::{AccountLookup, AccountRecord};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Public Hive API nodes used when none are configured
pub const DEFAULT_HIVE_ENDPOINTS: &[&str] = &[
    "https://api.hive.blog",
    "https://api.deathwing.me",
    "https://api.openhive.network",
];

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct HiveAccount {
    #[serde(default)]
    json_metadata: Option<String>,
}

/// Looks accounts up on Hive API nodes
#[derive(Debug, Clone)]
pub struct HiveAccountLookup {
    client: reqwest::Client,
    endpoints: Vec<String>,
    timeout: Duration,
}

impl Default for HiveAccountLookup {
    fn default() -> Self {
        Self::new(DEFAULT_HIVE_ENDPOINTS.iter().map(|s| s.to_string()).collect())
    }
}

impl HiveAccountLookup {
    pub fn new(endpoints: Vec<String>) -> Self {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Self {
            client: build_client(timeout),
            endpoints,
            timeout,
        }
    }

    /// Create with custom request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = build_client(timeout);
        self
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup_on(&self, endpoint: &str, account: &str) -> Result<Option<AccountRecord>, LookupError> {
        debug!("get_accounts [{}] via {}", account, endpoint);

        let response: RpcResponse = self
            .client
            .post(endpoint)
            .json(&get_accounts_request(account))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_get_accounts(endpoint, response)
    }
}

#[async_trait]
impl AccountLookup for HiveAccountLookup {
    async fn lookup(&self, account: &str) -> Result<Option<AccountRecord>, LookupError> {
        let mut last_error = LookupError::NoEndpoints;

        for endpoint in &self.endpoints {
            match self.lookup_on(endpoint, account).await {
                Ok(record) => return Ok(record),
                Err(e) => {
                    warn!("Hive API {} failed: {}", endpoint, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("flowerengine/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

fn get_accounts_request(account: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "condenser_api.get_accounts",
        "params": [[account]],
        "id": 1
    })
}

fn parse_get_accounts(endpoint: &str, response: RpcResponse) -> Result<Option<AccountRecord>, LookupError> {
    if let Some(err) = response.error {
        return Err(LookupError::Rpc {
            endpoint: endpoint.to_string(),
            code: err.code,
            message: err.message,
        });
    }

    let invalid = |reason: String| LookupError::InvalidResponse {
        endpoint: endpoint.to_string(),
        reason,
    };

    let result = response
        .result
        .ok_or_else(|| invalid("missing 'result'".to_string()))?;
    let mut accounts: Vec<HiveAccount> =
        serde_json::from_value(result).map_err(|e| invalid(e.to_string()))?;

    if accounts.is_empty() {
        return Ok(None);
    }

    Ok(Some(AccountRecord {
        metadata_payload: accounts.swap_remove(0).json_metadata,
    }))
}
