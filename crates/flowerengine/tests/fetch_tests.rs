//! Fetcher tests against an in-memory account lookup.

use flowerengine::{
    AvailableSelection, FakeAccountLookupBuilder, LookupError, MetadataError, MetadataFetcher,
    OverallSelection,
};
use serde_json::json;
use std::error::Error;

fn metadata() -> String {
    json!({
        "nodes": ["https://n1", "https://n2", "https://n3"],
        "failing_nodes": {"https://n1": "Timeout"},
        "report": [
            {
                "node": "https://n2",
                "engine": true,
                "token": {"ok": true},
                "config": {"ok": true},
                "latency": {"ok": true, "ms": 120},
                "weighted_score": 60
            },
            {
                "node": "https://n3",
                "engine": true,
                "token": {"ok": true},
                "config": {"ok": true},
                "latency": {"ok": true, "ms": 80},
                "weighted_score": 40
            },
            {
                "node": "https://n1",
                "engine": true,
                "weighted_score": 95
            }
        ],
        "parameter": {"account_name": "flowerengine", "script_version": "2.0"}
    })
    .to_string()
}

fn fetcher() -> MetadataFetcher<flowerengine::FakeAccountLookup> {
    MetadataFetcher::new(
        FakeAccountLookupBuilder::new()
            .account("flowerengine", &metadata())
            .account("garbled", "{\"nodes\": [")
            .account("emptystring", "")
            .account("noshape", "{\"report\": []}")
            .account_without_metadata("bare")
            .failing_account("unreachable", "all Hive API nodes down")
            .build(),
    )
}

#[tokio::test]
async fn fetch_valid_document() {
    let doc = fetcher().fetch_metadata("flowerengine").await.unwrap();

    assert_eq!(doc.nodes.len(), 3);
    assert_eq!(doc.failing_nodes["https://n1"], "Timeout");
    assert_eq!(doc.report.len(), 3);
    assert_eq!(doc.parameters().unwrap().script_version, "2.0");
}

#[tokio::test]
async fn fetch_unknown_account() {
    let err = fetcher().fetch_metadata("nobody").await.unwrap_err();
    assert!(matches!(err, MetadataError::AccountNotFound { .. }));
    assert_eq!(err.account(), "nobody");
}

#[tokio::test]
async fn fetch_account_without_metadata() {
    for account in ["bare", "emptystring"] {
        let err = fetcher().fetch_metadata(account).await.unwrap_err();
        assert!(
            matches!(err, MetadataError::EmptyMetadata { .. }),
            "{}: {:?}",
            account,
            err
        );
    }
}

/// Scenario 5: malformed payload names the account and the parse error
#[tokio::test]
async fn fetch_malformed_metadata() {
    let err = fetcher().fetch_metadata("garbled").await.unwrap_err();

    assert!(matches!(err, MetadataError::MalformedMetadata { .. }));
    assert_eq!(err.account(), "garbled");
    assert!(err.to_string().contains("@garbled"));
    assert!(err.source().is_some());
}

#[tokio::test]
async fn fetch_invalid_shape() {
    let err = fetcher().fetch_metadata("noshape").await.unwrap_err();
    match err {
        MetadataError::InvalidMetadataShape { field, .. } => assert_eq!(field, "nodes"),
        other => panic!("expected InvalidMetadataShape, got {:?}", other),
    }
}

#[tokio::test]
async fn lookup_failure_is_wrapped() {
    let err = fetcher().fetch_metadata("unreachable").await.unwrap_err();

    assert_eq!(err.stage(), "lookup");
    match err {
        MetadataError::Lookup { account, source } => {
            assert_eq!(account, "unreachable");
            assert!(matches!(source, LookupError::Unavailable(_)));
        }
        other => panic!("expected Lookup, got {:?}", other),
    }
}

#[tokio::test]
async fn each_operation_fetches_fresh() {
    let fetcher = fetcher();

    fetcher.fetch_metadata("flowerengine").await.unwrap();
    fetcher.list_active_and_failing("flowerengine").await.unwrap();
    fetcher.best_overall_node("flowerengine").await.unwrap();

    assert_eq!(fetcher.lookup().call_count("flowerengine"), 3);
}

#[tokio::test]
async fn update_nodes_returns_raw_lists() {
    let update = fetcher().update_nodes("flowerengine").await.unwrap();

    assert_eq!(update.nodes, vec!["https://n1", "https://n2", "https://n3"]);
    assert!(update.failing_nodes.contains_key("https://n1"));
    assert_eq!(update.full_metadata.nodes, update.nodes);
}

#[tokio::test]
async fn full_report_and_active_list() {
    let fetcher = fetcher();

    let report = fetcher.full_node_report("flowerengine").await.unwrap();
    assert_eq!(report.len(), 3);

    let view = fetcher.list_active_and_failing("flowerengine").await.unwrap();
    assert_eq!(view.active, vec!["https://n2", "https://n3"]);
    assert_eq!(view.failing.len(), 1);
}

#[tokio::test]
async fn both_policies_from_account() {
    let fetcher = fetcher();

    let available = fetcher.best_available_node("flowerengine").await.unwrap();
    assert_eq!(
        available,
        AvailableSelection::Fastest { node: "https://n3".into(), latency_ms: 80.0 }
    );

    // failing_nodes does not apply to the weighted-score policy
    let overall = fetcher.best_overall_node("flowerengine").await.unwrap();
    assert_eq!(
        overall,
        OverallSelection::Best { node: "https://n1".into(), weighted_score: 95.0 }
    );
}
