//! Splits a legacy `dictionary.json` into `dict/<letter>.json` shards.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "split_dictionary", about = "Split dictionary.json into per-letter shards")]
struct Cli {
    /// Single-file dictionary: a JSON object of word -> definition
    input: PathBuf,

    /// Directory that receives `dict/`
    #[arg(default_value = ".")]
    out_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let data = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let entries: HashMap<String, String> = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a word -> definition object", cli.input.display()))?;

    let (shards, summary) = lexilens_dictionary::split_legacy(entries);
    lexilens_dictionary::write_shards(&cli.out_dir, &shards)?;

    tracing::info!(
        "Wrote {} words into {} shards under {} ({} skipped, {} collisions)",
        summary.words,
        shards.len(),
        cli.out_dir.join("dict").display(),
        summary.skipped,
        summary.collisions
    );
    Ok(())
}
