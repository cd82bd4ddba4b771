// SPDX-FileCopyrightText: 2026 Civic Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Civic - civic data ingestion for one local region and the federal level.
//!
//! This is the binary entry point.

mod app;
mod fetcher;
mod show;
mod status;
mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use civic_config::CivicConfig;
use civic_core::types::{Collection, DataType, Slot};
use civic_core::CivicError;
use civic_storage::SqliteStore;

use crate::app::App;
use crate::fetcher::UnconfiguredFetcher;

/// Civic - civic data ingestion for one local region and the federal level.
#[derive(Parser, Debug)]
#[command(name = "civic", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one sync pass over every active plugin.
    Sync {
        /// Only sync this data type of the local plugin.
        #[arg(long)]
        data_type: Option<DataType>,
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Sync on the configured interval until interrupted.
    Run,
    /// List discovered and registered plugins.
    Plugins {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        plain: bool,
    },
    /// Report the health of each registered plugin.
    Health {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        plain: bool,
    },
    /// Persist the plugin used for a slot at the next startup.
    Select {
        /// Descriptor name of the plugin.
        name: String,
        /// Select the federal plugin instead of the local one.
        #[arg(long)]
        federal: bool,
    },
    /// Print one page of a reconciled collection as JSON.
    Show {
        collection: Collection,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = civic_core::types::DEFAULT_PAGE_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => civic_config::load_and_validate_path(path),
        None => civic_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            civic_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    let Some(command) = cli.command else {
        println!("civic: use --help for available commands");
        return;
    };

    if let Err(e) = run(config, command).await {
        eprintln!("civic: {e}");
        std::process::exit(1);
    }
}

async fn run(config: CivicConfig, command: Commands) -> Result<(), CivicError> {
    if let Commands::Select { name, federal } = &command {
        let slot = if *federal { Slot::Federal } else { Slot::Local };
        let store = SqliteStore::open(&config.storage).await?;
        let selected = show::run_select(&config, &store, slot, name).await;
        store.close().await?;
        return selected.map(|_| ());
    }

    let app = App::start(config, Arc::new(UnconfiguredFetcher)).await?;
    let outcome = match command {
        Commands::Sync {
            data_type,
            json,
            plain,
        } => sync::run_sync(&app, data_type, json, plain).await.map(|_| ()),
        Commands::Run => sync::run_scheduled(&app).await.map(|_| ()),
        Commands::Plugins { json, plain } => {
            status::run_plugins(&app, json, plain).await.map(|_| ())
        }
        Commands::Health { json, plain } => status::run_health(&app, json, plain).await.map(|_| ()),
        Commands::Show {
            collection,
            offset,
            limit,
        } => show::run_show(&app.engine, collection, offset, limit)
            .await
            .map(|_| ()),
        Commands::Select { .. } => Ok(()),
    };
    app.shutdown().await?;
    outcome
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("civic={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
