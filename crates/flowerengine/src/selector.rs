//! Node selection.
//!
//! Two independent policies over an already fetched document:
//! - [`best_available`]: fastest healthy node among those not flagged failing
//! - [`best_overall`]: highest `weighted_score` in the report, engine nodes only
//!
//! Both are pure and never mutate the document. "Nothing to recommend" is a
//! regular outcome, not an error.

use crate::types::{ActiveNodes, NodeMetadataDocument, NodeReport};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of the latency-first policy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AvailableSelection {
    /// Healthy node with the lowest reported latency
    Fastest { node: String, latency_ms: f64 },
    /// No node passed the health checks; first available node instead
    Fallback { node: String },
    /// Every published node is flagged failing (or none are published)
    NoAvailableNodes,
}

impl AvailableSelection {
    pub fn node(&self) -> Option<&str> {
        match self {
            AvailableSelection::Fastest { node, .. } | AvailableSelection::Fallback { node } => {
                Some(node)
            }
            AvailableSelection::NoAvailableNodes => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AvailableSelection::Fallback { .. })
    }
}

impl fmt::Display for AvailableSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailableSelection::Fastest { node, .. } | AvailableSelection::Fallback { node } => {
                write!(f, "{}", node)
            }
            AvailableSelection::NoAvailableNodes => write!(f, "no available nodes"),
        }
    }
}

/// Outcome of the weighted-score policy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OverallSelection {
    Best { node: String, weighted_score: f64 },
    /// The report is missing or empty
    NoReport,
    /// The report has rows but none with `engine: true`
    NoEngineNodes,
}

impl OverallSelection {
    pub fn node(&self) -> Option<&str> {
        match self {
            OverallSelection::Best { node, .. } => Some(node),
            OverallSelection::NoReport | OverallSelection::NoEngineNodes => None,
        }
    }

    /// Why nothing was recommended
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            OverallSelection::Best { .. } => None,
            OverallSelection::NoReport => Some("no node reports available"),
            OverallSelection::NoEngineNodes => Some("no Hive-Engine nodes in the report"),
        }
    }
}

impl fmt::Display for OverallSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallSelection::Best { node, .. } => write!(f, "{}", node),
            other => write!(f, "no best node ({})", other.reason().unwrap_or_default()),
        }
    }
}

/// `nodes` minus failing URLs, published order and duplicates kept
pub fn available_nodes(doc: &NodeMetadataDocument) -> Vec<&str> {
    doc.nodes
        .iter()
        .filter(|node| !doc.is_failing(node))
        .map(String::as_str)
        .collect()
}

/// Raw active/failing view, no report filtering
pub fn active_and_failing(doc: &NodeMetadataDocument) -> ActiveNodes {
    ActiveNodes {
        active: available_nodes(doc).into_iter().map(str::to_string).collect(),
        failing: doc.failing_nodes.clone(),
    }
}

/// Latency of a report that passes every health check
fn healthy_latency(report: &NodeReport) -> Option<f64> {
    if !(report.engine && report.token.ok && report.config.ok && report.latency.ok) {
        return None;
    }
    report.latency.millis()
}

/// Latency-first selection among nodes not flagged failing
pub fn best_available(doc: &NodeMetadataDocument) -> AvailableSelection {
    let available = available_nodes(doc);
    let Some(first) = available.first() else {
        return AvailableSelection::NoAvailableNodes;
    };

    let mut best: Option<(&str, f64)> = None;
    for node in &available {
        let Some(latency) = doc.report_for(node).and_then(healthy_latency) else {
            continue;
        };
        // strict < keeps the earliest node on ties
        if best.map_or(true, |(_, min)| latency < min) {
            best = Some((*node, latency));
        }
    }

    match best {
        Some((node, latency_ms)) => AvailableSelection::Fastest {
            node: node.to_string(),
            latency_ms,
        },
        None => {
            debug!("No healthy report among {} available nodes, using {}", available.len(), first);
            AvailableSelection::Fallback {
                node: first.to_string(),
            }
        }
    }
}

/// Highest weighted score among engine nodes, ignoring `failing_nodes`
pub fn best_overall(doc: &NodeMetadataDocument) -> OverallSelection {
    if doc.report.is_empty() {
        warn!("No node reports available to determine the best node.");
        return OverallSelection::NoReport;
    }

    let mut engine_nodes: Vec<&NodeReport> = doc.report.iter().filter(|r| r.engine).collect();
    if engine_nodes.is_empty() {
        warn!("No active Hive-Engine nodes found in the report.");
        return OverallSelection::NoEngineNodes;
    }

    // sort_by is stable: equal scores keep report order. NaN ranks last.
    engine_nodes.sort_by(|a, b| score_key(b).total_cmp(&score_key(a)));

    let best = engine_nodes[0];
    OverallSelection::Best {
        node: best.node.clone(),
        weighted_score: best.weighted_score,
    }
}

fn score_key(report: &NodeReport) -> f64 {
    if report.weighted_score.is_nan() {
        f64::NEG_INFINITY
    } else {
        report.weighted_score
    }
}
