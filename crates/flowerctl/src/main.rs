//! flowerctl - CLI for FlowerEngine node discovery
//!
//! Prints the published Hive-Engine node list, recommends a node and can
//! query token information on it.

use clap::Parser;
use flowerctl::cli::Cli;
use flowerctl::{commands, errors, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = match commands::run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            errors::exit_code_for(&e)
        }
    };

    std::process::exit(code);
}
