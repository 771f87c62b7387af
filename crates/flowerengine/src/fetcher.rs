//! Metadata fetcher.
//!
//! Looks an account up through the injected [`AccountLookup`], parses its
//! `json_metadata` and checks the two fields every consumer relies on:
//! `nodes` (array of URLs) and `failing_nodes` (URL -> reason object).
//! `report` and `parameter` are taken as-is and never fail the fetch.

use crate::error::MetadataError;
use crate::lookup::AccountLookup;
use crate::selector::{self, AvailableSelection, OverallSelection};
use crate::types::{ActiveNodes, FailingNodes, NodeMetadataDocument, NodeReport, NodeUpdateResult};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Account the FlowerEngine benchmark publishes to
pub const DEFAULT_ACCOUNT: &str = "flowerengine";

/// Fetches node metadata documents for Hive accounts
#[derive(Debug, Clone)]
pub struct MetadataFetcher<L> {
    lookup: L,
}

impl<L: AccountLookup> MetadataFetcher<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Fetch, parse and validate the metadata document of `account`
    pub async fn fetch_metadata(&self, account: &str) -> Result<NodeMetadataDocument, MetadataError> {
        debug!("Fetching node metadata from @{}", account);

        let record = self
            .lookup
            .lookup(account)
            .await
            .map_err(|source| MetadataError::Lookup {
                account: account.to_string(),
                source,
            })?
            .ok_or_else(|| MetadataError::AccountNotFound {
                account: account.to_string(),
            })?;

        let payload = match record.metadata_payload {
            Some(payload) if !payload.is_empty() => payload,
            _ => {
                return Err(MetadataError::EmptyMetadata {
                    account: account.to_string(),
                })
            }
        };

        let document = parse_metadata(account, &payload)?;
        debug!(
            "@{}: {} nodes, {} failing, {} report rows",
            account,
            document.nodes.len(),
            document.failing_nodes.len(),
            document.report.len()
        );
        Ok(document)
    }

    /// Raw node lists of `account` plus the full document
    pub async fn update_nodes(&self, account: &str) -> Result<NodeUpdateResult, MetadataError> {
        let document = self.fetch_metadata(account).await?;

        info!("Node update complete. Active nodes:");
        for (idx, node) in document.nodes.iter().enumerate() {
            info!("{}. {}", idx + 1, node);
        }
        if !document.failing_nodes.is_empty() {
            info!("Failing nodes:");
            for (node, reason) in &document.failing_nodes {
                info!("- {}: {}", node, reason);
            }
        }

        Ok(NodeUpdateResult {
            nodes: document.nodes.clone(),
            failing_nodes: document.failing_nodes.clone(),
            full_metadata: document,
        })
    }

    /// Benchmark report of `account`, empty when none is published
    pub async fn full_node_report(&self, account: &str) -> Result<Vec<NodeReport>, MetadataError> {
        Ok(self.fetch_metadata(account).await?.report)
    }

    pub async fn list_active_and_failing(&self, account: &str) -> Result<ActiveNodes, MetadataError> {
        let document = self.fetch_metadata(account).await?;
        Ok(selector::active_and_failing(&document))
    }

    /// Fetch, then apply the latency-first policy
    pub async fn best_available_node(&self, account: &str) -> Result<AvailableSelection, MetadataError> {
        let document = self.fetch_metadata(account).await?;
        Ok(selector::best_available(&document))
    }

    /// Fetch, then apply the weighted-score policy
    pub async fn best_overall_node(&self, account: &str) -> Result<OverallSelection, MetadataError> {
        let document = self.fetch_metadata(account).await?;
        Ok(selector::best_overall(&document))
    }
}

/// Parse and validate a raw `json_metadata` payload
pub fn parse_metadata(account: &str, payload: &str) -> Result<NodeMetadataDocument, MetadataError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|source| MetadataError::MalformedMetadata {
            account: account.to_string(),
            source,
        })?;

    let shape_error = |field: &'static str, reason: String| MetadataError::InvalidMetadataShape {
        account: account.to_string(),
        field,
        reason,
    };

    let mut root = match value {
        Value::Object(root) => root,
        other => {
            return Err(shape_error(
                "nodes",
                format!("is missing (metadata is a JSON {}, not an object)", json_type(&other)),
            ))
        }
    };

    let nodes = match root.remove("nodes") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(url) => Ok(url),
                other => Err(shape_error(
                    "nodes",
                    format!("contains a {} entry, expected strings", json_type(&other)),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(shape_error(
                "nodes",
                format!("must be an array, found {}", json_type(&other)),
            ))
        }
        None => return Err(shape_error("nodes", "is missing".to_string())),
    };

    let failing_nodes = match root.remove("failing_nodes") {
        Some(Value::Object(map)) => failing_reasons(map),
        Some(other) => {
            return Err(shape_error(
                "failing_nodes",
                format!("must be an object, found {}", json_type(&other)),
            ))
        }
        None => return Err(shape_error("failing_nodes", "is missing".to_string())),
    };

    let report = parse_report(account, root.remove("report"));
    let parameter = root.remove("parameter").filter(|p| !p.is_null());

    Ok(NodeMetadataDocument {
        nodes,
        failing_nodes,
        report,
        parameter,
        extra: root,
    })
}

fn failing_reasons(map: Map<String, Value>) -> FailingNodes {
    map.into_iter()
        .map(|(node, reason)| {
            let reason = match reason {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (node, reason)
        })
        .collect()
}

/// Lenient report parsing: a bad row is skipped, a bad report is empty
fn parse_report(account: &str, raw: Option<Value>) -> Vec<NodeReport> {
    let rows = match raw {
        Some(Value::Array(rows)) => rows,
        Some(Value::Null) | None => {
            debug!("@{} publishes no report", account);
            return Vec::new();
        }
        Some(other) => {
            warn!("@{}: 'report' is a {}, ignoring it", account, json_type(&other));
            return Vec::new();
        }
    };

    rows.into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value::<NodeReport>(row) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("@{}: skipping report row {}: {}", account, idx, e);
                None
            }
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
