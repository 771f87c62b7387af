//! Command line surface of flowerctl.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flowerengine::FlowerConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "flowerctl")]
#[command(about = "Discover and rank Hive-Engine nodes published by FlowerEngine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Hive account holding the node list
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Config file (default: <config dir>/flowerengine/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Hive API endpoint to use instead of the configured ones (repeatable)
    #[arg(long = "endpoint", global = true)]
    pub endpoints: Vec<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show active and failing nodes
    Nodes,

    /// Recommend a single node
    Best {
        #[arg(long, value_enum, default_value_t = Policy::Overall)]
        policy: Policy,
    },

    /// Show the benchmark report
    Report {
        /// Show only the first N rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Look a token up on the best overall node
    Token {
        /// Token symbol (e.g. SWAP.HIVE)
        symbol: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Lowest latency among nodes not flagged failing
    Available,
    /// Highest weighted score in the report
    Overall,
}

impl Cli {
    /// Config file plus command line overrides
    pub fn resolve_config(&self) -> Result<FlowerConfig> {
        let mut config = match &self.config {
            Some(path) => FlowerConfig::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => FlowerConfig::load(),
        };

        if let Some(account) = &self.account {
            config.account = account.clone();
        }
        if !self.endpoints.is_empty() {
            config.hive.endpoints = self.endpoints.clone();
        }

        Ok(config)
    }
}
