use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use lexilens_config::Config;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod controller;
mod events;
mod io;
mod profile;
mod sources;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "lexilens", about = "Photograph a word, read it, look it up")]
#[command(version)]
struct Cli {
    /// Profile file (`{ "name": .., "value": <config> }`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `profiles/`; created on first run
    #[arg(long)]
    home: Option<PathBuf>,

    /// Still image standing in for the camera stream
    #[arg(long)]
    image: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = profile::load_config(cli.config.as_deref(), cli.home.as_deref())?;
    init_tracing(&config, cli.verbose);
    tracing::info!("Starting lexilens v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(config, cli.image));
    // A pending stdin read cannot be cancelled
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

async fn run(config: Config, image: Option<PathBuf>) -> anyhow::Result<()> {
    let offline_assets = config.offline.assets.clone();
    let state = Arc::new(AppState::new(config, image)?);
    if let Some(cache) = &state.assets {
        sources::prepare_offline(cache, &offline_assets).await;
    }

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for ctrl+c: {e}");
            }
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;
    Ok(())
}
