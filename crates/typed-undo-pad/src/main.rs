use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use typed_undo::HistoryConfig;
use typed_undo_pad::{Command, Pad};

/// Line-oriented scratch pad driven by undoable edits.
///
/// Reads commands (`type <text>`, `delete <n>`, `select <a> <b>`, `undo`,
/// `redo`, `save`, `clear`, `limit <n>`, `show`) one per line and prints
/// the document after each.
#[derive(Parser, Debug)]
#[command(name = "typed-undo-pad", version, about)]
struct Cli {
    /// Script to run. Reads stdin when omitted.
    script: Option<PathBuf>,

    /// Maximum number of undo steps kept.
    #[arg(long)]
    limit: Option<usize>,

    /// JSON history config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at info level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => HistoryConfig::load_or_default(path),
        None => HistoryConfig::resolve(),
    };
    if let Some(limit) = cli.limit {
        config.limit = limit;
        config.sanitize();
    }
    tracing::info!(limit = config.limit, "Starting typed-undo-pad");

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open script: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(std::io::stdin().lock()),
    };

    let mut pad = Pad::new(&config);
    for (number, line) in input.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        // Trailing spaces are kept: `type` treats them as text.
        let line = line.trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') {
            continue;
        }
        let result = line
            .parse::<Command>()
            .and_then(|command| pad.execute(command));
        if let Err(e) = result {
            eprintln!("line {}: {e:#}", number + 1);
        }
        println!("{}", pad.status());
    }

    Ok(())
}
