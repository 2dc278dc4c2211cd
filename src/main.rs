//! Runs lite-path queries against a JSON configuration tree through the
//! shortcut layer.
//!
//! Usage:
//!   refindex [--tree FILE] [--no-shortcuts] QUERY...
//!
//! Every query prints one line: the JSON array of its results.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use refindex::configuration::Configuration;
use refindex::memory::MemoryConfiguration;
use refindex::resolver::ReferenceShortcuts;
use refindex::settings::Settings;
use refindex::{ConfError, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "refindex")]
#[command(about = "Runs lite-path queries through the reference-index shortcuts")]
struct Args {
    /// JSON file holding the configuration tree (overrides store.tree)
    #[arg(short, long, value_name = "FILE")]
    tree: Option<PathBuf>,

    /// Send every query to the full tree search
    #[arg(long)]
    no_shortcuts: bool,

    /// Lite-path queries to run
    #[arg(required = true, value_name = "QUERY")]
    queries: Vec<String>,
}

fn run(settings: Settings, args: Args) -> Result<()> {
    let tree = args
        .tree
        .or(settings.store.tree)
        .ok_or_else(|| ConfError::Settings("no configuration tree given (--tree or store.tree)".into()))?;
    let store = Arc::new(MemoryConfiguration::from_file(&tree)?);
    if settings.store.build_index {
        let entries = store.reindex()?;
        info!(tree = %tree.display(), entries, "configuration loaded");
    }
    let shortcuts = ReferenceShortcuts::new(Arc::clone(&store), Arc::clone(&store))
        .enabled(settings.shortcuts.enabled && !args.no_shortcuts);
    for query in &args.queries {
        let results: Vec<_> = shortcuts.search(query)?.collect();
        println!("{}", serde_json::Value::Array(results));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();
    match run(settings, args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
