//! Feedhound main entry point
//!
//! Command-line front end mapping the deployed entry points (index, status,
//! scrape) onto the scrape core.

use clap::{Parser, Subcommand};
use feedhound::config::load_config_with_hash;
use feedhound::handlers::{self, ScrapeRequest};
use feedhound::storage::FsBlobStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Feedhound: a resumable marketplace listing scraper
#[derive(Parser, Debug)]
#[command(name = "feedhound")]
#[command(version = "1.0.0")]
#[command(about = "Scrape marketplace listing URLs with checkpointed resume", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the job targets this configuration can scrape
    Index,

    /// Show the checkpointed state of a job
    Status {
        /// Job id, as printed by `index` or `scrape`
        job_id: String,
    },

    /// Run one scrape invocation for a category
    Scrape {
        /// Category/query to scrape (must be listed in the config)
        query: String,

        /// Override the derived job id
        #[arg(long)]
        job_id: Option<String>,

        /// Discard previous state for this job and start over
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let blobs = FsBlobStore::new(&config.storage.root);

    match cli.command {
        Command::Index => {
            for target in handlers::index(&config) {
                println!(
                    "{}  {}  {}",
                    target.job_id, target.category, target.starting_url
                );
            }
        }

        Command::Status { job_id } => {
            let report = handlers::status(&config, &blobs, &job_id)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Scrape {
            query,
            job_id,
            reset,
        } => {
            let request = ScrapeRequest {
                query,
                job_id,
                reset,
            };
            let outcome = handlers::scrape(&config, &blobs, &request).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("feedhound=info,warn"),
            1 => EnvFilter::new("feedhound=debug,info"),
            2 => EnvFilter::new("feedhound=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
