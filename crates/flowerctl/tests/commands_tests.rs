//! flowerctl command tests against an in-memory account lookup.
//!
//! Covers nodes / best / report output in text and JSON form and the exit
//! codes used for "no recommendation" and fetch failures. `token` needs a
//! live engine node and is not exercised here.

use flowerctl::cli::{Commands, Policy};
use flowerctl::commands::execute;
use flowerctl::errors::{
    exit_code_for, EXIT_ACCOUNT_UNUSABLE, EXIT_INVALID_METADATA, EXIT_NO_RECOMMENDATION,
    EXIT_SUCCESS,
};
use flowerengine::{FakeAccountLookup, FakeAccountLookupBuilder, FlowerConfig, MetadataFetcher};
use serde_json::{json, Value};

fn lookup() -> FakeAccountLookup {
    let published = json!({
        "nodes": ["https://n1", "https://n2"],
        "failing_nodes": {"https://n1": "Timeout"},
        "report": [
            {
                "node": "https://n2",
                "engine": true,
                "token": {"ok": true},
                "config": {"ok": true},
                "latency": {"ok": true, "avg_latency": 45.0},
                "weighted_score": 77.0
            },
            {"node": "https://n1", "engine": false, "weighted_score": 99.0}
        ]
    });
    let all_failing = json!({
        "nodes": ["https://n1"],
        "failing_nodes": {"https://n1": "Timeout"}
    });

    FakeAccountLookupBuilder::new()
        .account("flowerengine", &published.to_string())
        .account("allfailing", &all_failing.to_string())
        .account("broken", "not json")
        .build()
}

fn config(account: &str) -> FlowerConfig {
    FlowerConfig {
        account: account.to_string(),
        ..Default::default()
    }
}

async fn run(command: Commands, account: &str, json: bool) -> anyhow::Result<(i32, String)> {
    let fetcher = MetadataFetcher::new(lookup());
    let mut out = Vec::new();
    let code = execute(&command, &fetcher, &config(account), json, &mut out).await?;
    Ok((code, String::from_utf8(out).unwrap()))
}

#[tokio::test]
async fn nodes_text() {
    let (code, text) = run(Commands::Nodes, "flowerengine", false).await.unwrap();

    assert_eq!(code, EXIT_SUCCESS);
    assert!(text.contains("Active nodes (1):"));
    assert!(text.contains("1. https://n2"));
    assert!(text.contains("- https://n1: Timeout"));
}

#[tokio::test]
async fn nodes_json() {
    let (_, text) = run(Commands::Nodes, "flowerengine", true).await.unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["active"], json!(["https://n2"]));
    assert_eq!(value["failing"]["https://n1"], "Timeout");
}

#[tokio::test]
async fn best_available_text() {
    let (code, text) = run(
        Commands::Best { policy: Policy::Available },
        "flowerengine",
        false,
    )
    .await
    .unwrap();

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(text.trim(), "https://n2 (latency 45.00 ms)");
}

#[tokio::test]
async fn best_overall_json() {
    let (code, text) = run(
        Commands::Best { policy: Policy::Overall },
        "flowerengine",
        true,
    )
    .await
    .unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(code, EXIT_SUCCESS);
    assert_eq!(value["outcome"], "best");
    assert_eq!(value["node"], "https://n2");
}

#[tokio::test]
async fn best_without_candidates_exits_nonzero() {
    let (code, text) = run(
        Commands::Best { policy: Policy::Available },
        "allfailing",
        false,
    )
    .await
    .unwrap();
    assert_eq!(code, EXIT_NO_RECOMMENDATION);
    assert_eq!(text.trim(), "no available nodes");

    let (code, text) = run(Commands::Best { policy: Policy::Overall }, "allfailing", true)
        .await
        .unwrap();
    assert_eq!(code, EXIT_NO_RECOMMENDATION);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["outcome"], "no_report");
}

#[tokio::test]
async fn token_without_best_node_does_not_query() {
    let (code, text) = run(
        Commands::Token { symbol: "SWAP.HIVE".into() },
        "allfailing",
        false,
    )
    .await
    .unwrap();

    assert_eq!(code, EXIT_NO_RECOMMENDATION);
    assert!(text.starts_with("Could not determine a best node"));
}

#[tokio::test]
async fn report_json_respects_limit() {
    let (_, text) = run(Commands::Report { limit: Some(1) }, "flowerengine", true)
        .await
        .unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["node"], "https://n2");
}

#[tokio::test]
async fn fetch_errors_map_to_exit_codes() {
    let err = run(Commands::Nodes, "broken", false).await.unwrap_err();
    assert_eq!(exit_code_for(&err), EXIT_INVALID_METADATA);
    assert!(format!("{:#}", err).contains("@broken"));

    let err = run(Commands::Nodes, "nobody", false).await.unwrap_err();
    assert_eq!(exit_code_for(&err), EXIT_ACCOUNT_UNUSABLE);
}
