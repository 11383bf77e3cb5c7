//! Carwise - guided vehicle selection for the dealership floor
//!
//! Terminal host for the finance wizard: loads the catalog (live endpoints
//! with offline fallback), browses its facets, and walks a customer through
//! brand, model, category, year and bank.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use carwise_core::{CatalogClient, CatalogConfig, CatalogEvent, CatalogSnapshot, WizardSession};

mod catalog_cli;
mod wizard_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "carwise",
    about = "Guided vehicle selection and financing wizard",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON (always on stderr)
    #[clap(long, global = true)]
    json_logs: bool,

    /// Catalog configuration file (overrides project and global config)
    #[clap(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Load the catalog and show its facets
    Catalog {
        /// Skip the network and use the offline catalog
        #[clap(long)]
        offline: bool,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Run the finance wizard
    Wizard {
        /// Skip the network and use the offline catalog
        #[clap(long)]
        offline: bool,

        /// Apply these choices instead of prompting (e.g. finance,Ford,Mustang,back,Ranger)
        #[clap(long, value_delimiter = ',')]
        choices: Option<Vec<String>>,

        /// Output the final state as JSON (scripted mode only)
        #[clap(long, requires = "choices")]
        json: bool,
    },

    /// Find the catalog record for a brand, model and optional year
    Match {
        #[clap(long)]
        brand: String,

        #[clap(long)]
        model: String,

        #[clap(long)]
        year: Option<String>,

        /// Skip the network and use the offline catalog
        #[clap(long)]
        offline: bool,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },
}

/// Initialize tracing with CLI flags
///
/// Logs always go to stderr so stdout stays clean for JSON output.
fn initialize_tracing(log_level: &LogLevel, json_logs: bool) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the catalog, collecting the attempt events for display
async fn load_catalog(
    config_path: Option<&PathBuf>,
    offline: bool,
) -> Result<(CatalogSnapshot, Vec<CatalogEvent>)> {
    let mut client = if offline {
        debug!("Offline mode, skipping catalog endpoints");
        CatalogClient::offline()
    } else {
        let config = CatalogConfig::discover(config_path.map(PathBuf::as_path))
            .context("Failed to load catalog configuration")?;
        CatalogClient::from_config(&config).context("Failed to set up catalog endpoints")?
    };

    let mut events = client.subscribe();
    let snapshot = client.load_catalog().await;
    drop(client);

    let mut collected = Vec::new();
    while let Some(event) = events.recv().await {
        collected.push(event);
    }

    info!(
        records = snapshot.records.len(),
        degraded = snapshot.degraded,
        "Catalog ready"
    );
    if snapshot.degraded {
        eprintln!("Note: catalog service unavailable, using offline data");
    }

    Ok((snapshot, collected))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.json_logs);

    match cli.command {
        Command::Catalog { offline, json } => {
            let (snapshot, events) = load_catalog(cli.config.as_ref(), offline).await?;
            catalog_cli::show_catalog(&snapshot, &events, json)
        }
        Command::Wizard {
            offline,
            choices,
            json,
        } => {
            let (snapshot, _) = load_catalog(cli.config.as_ref(), offline).await?;
            let mut session = WizardSession::new(snapshot);
            let stdout = io::stdout();
            let mut out = stdout.lock();

            match choices {
                Some(choices) => wizard_cli::run_scripted(&mut session, &choices, json, &mut out)?,
                None => wizard_cli::run_interactive(&mut session, io::stdin().lock(), &mut out)?,
            }
            out.flush().context("Failed to flush output")
        }
        Command::Match {
            brand,
            model,
            year,
            offline,
            json,
        } => {
            let (snapshot, _) = load_catalog(cli.config.as_ref(), offline).await?;
            catalog_cli::show_match(&snapshot, brand, model, year, json)
        }
    }
}
