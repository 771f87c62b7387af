//! Node metadata document as published on the FlowerEngine account.
//!
//! Key names match the published JSON exactly, including the mixed-case
//! `SSCnodeVersion`. Report fields other than `node` default when absent so a
//! partially filled benchmark row still deserializes.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Mapping from node URL to the reason it is flagged as failing, published order
pub type FailingNodes = IndexMap<String, String>;

/// `null` reads as the type's default, like an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parsed and shape-validated account metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadataDocument {
    /// Node URLs in published order (duplicates are kept)
    pub nodes: Vec<String>,
    pub failing_nodes: FailingNodes,
    #[serde(default)]
    pub report: Vec<NodeReport>,
    /// Provenance of the benchmark run, opaque to selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Value>,
    /// Any other top-level keys, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeMetadataDocument {
    /// Typed view of `parameter`, if present and well-formed
    pub fn parameters(&self) -> Option<ReportParameters> {
        self.parameter
            .as_ref()
            .and_then(|p| serde_json::from_value(p.clone()).ok())
    }

    /// First report row for a node URL
    pub fn report_for(&self, node: &str) -> Option<&NodeReport> {
        self.report.iter().find(|r| r.node == node)
    }

    pub fn is_failing(&self, node: &str) -> bool {
        self.failing_nodes.contains_key(node)
    }
}

// Only `ok`, `engine`, `weighted_score` and the latency figures drive
// selection. Every other number is informational: optional, any JSON number.

/// Per-benchmark outcome (token, contract, account_history)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeBenchmark {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ok: bool,
    #[serde(default)]
    pub count: Option<f64>,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub rank: Option<f64>,
}

/// Config endpoint benchmark
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ok: bool,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub access_time: Option<f64>,
    #[serde(default)]
    pub rank: Option<f64>,
}

/// Latency benchmark
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLatency {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ok: bool,
    #[serde(default)]
    pub min_latency: Option<f64>,
    #[serde(default)]
    pub max_latency: Option<f64>,
    #[serde(default)]
    pub avg_latency: Option<f64>,
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub rank: Option<f64>,
    /// Single latency figure some publishers emit instead of the averages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms: Option<f64>,
}

impl NodeLatency {
    /// Latency in milliseconds: `ms` when published, else `avg_latency`
    pub fn millis(&self) -> Option<f64> {
        self.ms.or(self.avg_latency).filter(|v| v.is_finite())
    }
}

/// One benchmark row for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    pub node: String,
    #[serde(rename = "SSCnodeVersion", default, deserialize_with = "null_as_default")]
    pub ssc_node_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub engine: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: NodeBenchmark,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contract: NodeBenchmark,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_history: NodeBenchmark,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: NodeConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latency: NodeLatency,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weighted_score: f64,
    #[serde(default)]
    pub tests_completed: Option<f64>,
    /// Benchmarks this crate does not model (e.g. `block`), kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data lists recorded for one benchmark dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkData {
    #[serde(default)]
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSet {
    #[serde(default)]
    pub token: BenchmarkData,
    #[serde(default)]
    pub contract: BenchmarkData,
    #[serde(default)]
    pub account_history: BenchmarkData,
    #[serde(default)]
    pub config: BenchmarkData,
    #[serde(default)]
    pub latency: BenchmarkData,
}

/// Per-dimension weights used to compute `weighted_score`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default)]
    pub token: f64,
    #[serde(default)]
    pub contract: f64,
    #[serde(default)]
    pub account_history: f64,
    #[serde(default)]
    pub config: f64,
    #[serde(default)]
    pub latency: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedScoring {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub description: String,
}

/// Parameters of the benchmark run that produced the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParameters {
    pub start_time: String,
    pub end_time: String,
    pub duration: f64,
    pub timestamp: String,
    pub nectar_engine_version: String,
    pub script_version: String,
    pub num_retries: u32,
    pub num_retries_call: u32,
    pub timeout: f64,
    pub threading: bool,
    pub seconds: f64,
    pub account_name: String,
    pub token: String,
    pub contract: String,
    pub benchmarks: BenchmarkSet,
    pub weighted_scoring: WeightedScoring,
}

/// Raw node lists plus the full document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeUpdateResult {
    pub nodes: Vec<String>,
    pub failing_nodes: FailingNodes,
    #[serde(rename = "fullMetadata")]
    pub full_metadata: NodeMetadataDocument,
}

/// Active/failing breakdown of the published node list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActiveNodes {
    /// `nodes` minus failing URLs, published order
    pub active: Vec<String>,
    pub failing: FailingNodes,
}
