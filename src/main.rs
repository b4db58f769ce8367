//! Host tester CLI
//!
//! Runs every test from a YAML configuration against every host in a
//! targets file and exits non-zero if any of them fails.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tester::common::logging;
use tester::testing::{load_hosts, run_tests, TestConfig};

#[derive(Parser)]
#[command(name = "tester", about = "Run shell checks against a list of target hosts")]
#[command(version, long_about = None)]
struct Cli {
    /// Path to the YAML test configuration
    config: PathBuf,

    /// Path to the targets file, one host per line
    targets: PathBuf,

    /// Log captured command output alongside each result
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if std::env::args_os().len() <= 1 {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    let cli = Cli::parse();
    logging::init_cli();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> tester::Result<()> {
    let config = TestConfig::load(&cli.config)?;
    let hosts = load_hosts(&cli.targets)?;
    run_tests(&hosts, &config, cli.verbose).await
}
