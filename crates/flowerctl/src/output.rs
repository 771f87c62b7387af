//! Text rendering for flowerctl.

use flowerengine::{ActiveNodes, AvailableSelection, NodeReport, OverallSelection, TokenInfo};
use std::fmt::Write;

fn ok_mark(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "FAIL"
    }
}

pub fn render_nodes(view: &ActiveNodes) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Active nodes ({}):", view.active.len());
    for (idx, node) in view.active.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, node);
    }

    if !view.failing.is_empty() {
        let _ = writeln!(out, "Failing nodes ({}):", view.failing.len());
        for (node, reason) in &view.failing {
            let _ = writeln!(out, "  - {}: {}", node, reason);
        }
    }

    out
}

pub fn render_available(selection: &AvailableSelection) -> String {
    match selection {
        AvailableSelection::Fastest { node, latency_ms } => {
            format!("{} (latency {:.2} ms)", node, latency_ms)
        }
        AvailableSelection::Fallback { node } => {
            format!("{} (fallback: no node passed every health check)", node)
        }
        AvailableSelection::NoAvailableNodes => selection.to_string(),
    }
}

pub fn render_overall(selection: &OverallSelection) -> String {
    match selection {
        OverallSelection::Best { node, weighted_score } => {
            format!("{} (weighted score {:.2})", node, weighted_score)
        }
        other => other.to_string(),
    }
}

pub fn render_report(report: &[NodeReport], limit: Option<usize>) -> String {
    if report.is_empty() {
        return "No report data available.\n".to_string();
    }

    let shown = limit.unwrap_or(report.len()).min(report.len());
    let mut out = String::new();
    for row in &report[..shown] {
        let latency = row
            .latency
            .millis()
            .map(|ms| format!("{:.2}", ms))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(
            out,
            "{}  engine={} token={} config={} latency={} score={:.2}",
            row.node,
            row.engine,
            ok_mark(row.token.ok),
            ok_mark(row.config.ok),
            latency,
            row.weighted_score
        );
    }
    if shown < report.len() {
        let _ = writeln!(out, "... (and {} more entries)", report.len() - shown);
    }
    out
}

pub fn render_token(token: &TokenInfo) -> String {
    format!(
        "{} ({})\n  issuer: {}\n  precision: {}\n  supply: {} / max {}\n  circulating: {}\n  staking: {}  delegation: {}\n",
        token.symbol,
        token.name,
        token.issuer,
        token.precision,
        token.supply,
        token.max_supply,
        token.circulating_supply,
        token.staking_enabled,
        token.delegation_enabled
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowerengine::{NodeBenchmark, NodeConfig, NodeLatency};

    fn row(node: &str) -> NodeReport {
        NodeReport {
            node: node.to_string(),
            ssc_node_version: "1.9.3".to_string(),
            engine: true,
            token: NodeBenchmark { ok: true, ..Default::default() },
            contract: NodeBenchmark::default(),
            account_history: NodeBenchmark::default(),
            config: NodeConfig::default(),
            latency: NodeLatency { ok: true, avg_latency: Some(12.5), ..Default::default() },
            weighted_score: 80.0,
            tests_completed: Some(5.0),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_render_nodes() {
        let view = ActiveNodes {
            active: vec!["https://a".into(), "https://b".into()],
            failing: [("https://c".to_string(), "Timeout".to_string())].into_iter().collect(),
        };

        let text = render_nodes(&view);
        assert!(text.contains("  1. https://a"));
        assert!(text.contains("  2. https://b"));
        assert!(text.contains("- https://c: Timeout"));
    }

    #[test]
    fn test_render_report_limit() {
        let report = vec![row("https://a"), row("https://b"), row("https://c")];

        let text = render_report(&report, Some(2));
        assert!(text.contains("https://a  engine=true token=ok config=FAIL latency=12.50 score=80.00"));
        assert!(!text.contains("https://c"));
        assert!(text.contains("and 1 more entries"));

        assert_eq!(render_report(&[], None), "No report data available.\n");
    }

    #[test]
    fn test_render_selections() {
        assert_eq!(
            render_available(&AvailableSelection::NoAvailableNodes),
            "no available nodes"
        );
        assert!(render_available(&AvailableSelection::Fallback { node: "https://a".into() })
            .starts_with("https://a (fallback"));
        assert_eq!(
            render_overall(&OverallSelection::Best { node: "https://a".into(), weighted_score: 91.5 }),
            "https://a (weighted score 91.50)"
        );
        assert!(render_overall(&OverallSelection::NoReport).starts_with("no best node"));
    }
}
