mod cli;
mod config;
mod dedup;
mod discover;
mod gh;
mod identity;
mod model;
mod orchestrator;
mod patterns;
mod prioritize;
mod queue;
mod report;
mod select;
mod stats;
mod storage;
mod tasks;
mod tracker;
mod vocabulary;

use std::{env, io, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays clean for command output.
///
/// `RUST_LOG` wins over `--log-level`; `LOG_FORMAT=json` emits JSON lines.
fn init_logging(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| format!("invalid log filter '{level}': {e}"))?;

    let json = env::var("LOG_FORMAT").is_ok_and(|f| f == "json");
    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .compact()
            .try_init()
    };

    result.map_err(|e| format!("failed to initialize logging: {e}"))
}
