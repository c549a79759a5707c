//! Stock watcher CLI
//!
//! Runs a single check per invocation. Scheduling is left to an external
//! job runner (cron, CI schedule, systemd timer).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stock_watch::{
    error::Result,
    models::Config,
    pipeline,
    services::{AvailabilityFetcher, NtfyNotifier, TransitionNotifier},
    storage::{LocalStateStore, StateStore},
    utils::http,
};

/// Product availability watcher
#[derive(Parser, Debug)]
#[command(
    name = "stock-watch",
    version,
    about = "Alerts when a product variant comes back in stock"
)]
struct Cli {
    /// TOML configuration file (default: read from environment)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the snapshot file location
    #[arg(long)]
    state_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check availability once and alert on a transition (default)
    Check,

    /// Show the persisted snapshot
    State,

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build configuration from the chosen source.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            Config::load(path)?
        }
        None => Config::from_env()?,
    };

    if let Some(path) = &cli.state_path {
        config.state.path = path.clone();
    }

    Ok(config)
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let store = LocalStateStore::new(&config.state.path);

    match cli.command.unwrap_or(Command::Check) {
        Command::Check => {
            config.validate()?;

            let client = http::create_async_client(&config.http)?;
            let fetcher = AvailabilityFetcher::new(&config, client.clone())?;
            let ntfy = NtfyNotifier::new(&config, client)?;
            let notifier = TransitionNotifier::new(&ntfy, &config)?;

            let outcome = pipeline::run_check(&fetcher, &store, &notifier).await?;

            println!("availability: {}", outcome.availability);
            println!(
                "in_stock: {} prev: {}",
                outcome.in_stock,
                outcome
                    .previous
                    .map_or_else(|| "none".to_string(), |p| p.to_string())
            );
        }

        Command::State => {
            let state = store.load().await;
            log::info!("Snapshot: {}", store.path().display());
            println!("{}", serde_json::to_string_pretty(&state)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Product endpoint: {}", config.product.endpoint_url);
            log::info!("✓ Request mode: {}", config.product.request_mode);
            log::info!("✓ Notify endpoint: {}", config.notify.endpoint()?);
            log::info!("✓ Snapshot path: {}", config.state.path.display());
        }
    }

    Ok(())
}
