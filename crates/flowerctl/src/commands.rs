//! Command handlers for flowerctl.

use crate::cli::{Cli, Commands, Policy};
use crate::errors::{EXIT_NO_RECOMMENDATION, EXIT_SUCCESS};
use crate::output;
use anyhow::{Context, Result};
use flowerengine::{AccountLookup, EngineClient, FlowerConfig, MetadataFetcher};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Resolve config, build the Hive lookup and run the command
pub async fn run(cli: &Cli) -> Result<i32> {
    let config = cli.resolve_config()?;
    let fetcher = MetadataFetcher::new(config.hive_lookup());
    let mut stdout = std::io::stdout();
    execute(&cli.command, &fetcher, &config, cli.json, &mut stdout).await
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode JSON output")?;
    writeln!(out, "{}", text)?;
    Ok(())
}

/// Run one command against an already built fetcher
pub async fn execute<L: AccountLookup, W: Write>(
    command: &Commands,
    fetcher: &MetadataFetcher<L>,
    config: &FlowerConfig,
    json: bool,
    out: &mut W,
) -> Result<i32> {
    let account = config.account.as_str();

    match command {
        Commands::Nodes => {
            let view = fetcher
                .list_active_and_failing(account)
                .await
                .context("Failed to fetch node list")?;
            if json {
                print_json(out, &view)?;
            } else {
                write!(out, "{}", output::render_nodes(&view))?;
            }
            Ok(EXIT_SUCCESS)
        }

        Commands::Best { policy } => {
            let (found, text) = match policy {
                Policy::Available => {
                    let selection = fetcher
                        .best_available_node(account)
                        .await
                        .context("Failed to select best available node")?;
                    if json {
                        print_json(out, &selection)?;
                    }
                    (selection.node().is_some(), output::render_available(&selection))
                }
                Policy::Overall => {
                    let selection = fetcher
                        .best_overall_node(account)
                        .await
                        .context("Failed to select best overall node")?;
                    if json {
                        print_json(out, &selection)?;
                    }
                    (selection.node().is_some(), output::render_overall(&selection))
                }
            };
            if !json {
                writeln!(out, "{}", text)?;
            }
            Ok(if found { EXIT_SUCCESS } else { EXIT_NO_RECOMMENDATION })
        }

        Commands::Report { limit } => {
            let report = fetcher
                .full_node_report(account)
                .await
                .context("Failed to fetch node report")?;
            if json {
                let shown = limit.unwrap_or(report.len()).min(report.len());
                print_json(out, &report[..shown])?;
            } else {
                write!(out, "{}", output::render_report(&report, *limit))?;
            }
            Ok(EXIT_SUCCESS)
        }

        Commands::Token { symbol } => {
            let selection = fetcher
                .best_overall_node(account)
                .await
                .context("Failed to select best overall node")?;
            let Some(node) = selection.node() else {
                writeln!(out, "Could not determine a best node to query: {}", selection)?;
                return Ok(EXIT_NO_RECOMMENDATION);
            };

            info!("Querying {} token information on {}", symbol, node);
            let client = EngineClient::with_timeout(node, config.engine.effective_timeout());
            let token = client
                .token_info(symbol)
                .await
                .with_context(|| format!("Failed to query {} on {}", symbol, node))?;

            match token {
                Some(token) if json => print_json(out, &token)?,
                Some(token) => write!(out, "{}", output::render_token(&token))?,
                None => writeln!(out, "{} token not found on {}", symbol, node)?,
            }
            Ok(EXIT_SUCCESS)
        }
    }
}
