//! Route Filter - command-line and desktop host
//!
//! Loads the persisted route selection and drives the filter control either
//! from a REPL or from an egui window.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use route_filter::cli::Repl;
use route_filter::config::AppConfig;
use route_filter::logging::init_logging;
use route_filter::paths::AppPaths;
use route_filter::selection::categorize;
use route_filter::storage::{KeyValueBackend, MemoryBackend, PersistentStateStore, SledBackend};
use route_filter::FilterSession;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Route Filter - pick transit routes to show on the map
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// GTFS routes.txt to read route ids from (overrides config)
    #[arg(long, env = "ROUTE_FILTER_ROUTES")]
    routes: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Open the desktop host instead of the REPL
    #[arg(long)]
    gui: bool,

    /// Print the known routes by category and exit
    #[arg(long)]
    list_routes: bool,

    /// Print the stored filter state and exit
    #[arg(long)]
    print_state: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let paths = AppPaths::detect();
    paths
        .ensure_directories()
        .context("Failed to create application directories")?;

    let _log_guard = init_logging(&args.log_level, Some(&paths.logs_dir))?;

    info!("Starting Route Filter v{}...", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.clone().unwrap_or_else(|| paths.config.clone());
    info!("Configuration file: {}", config_path.display());

    if args.init_config {
        return init_config(&config_path);
    }

    let mut config = AppConfig::load_or_default(&config_path)?;

    if let Some(routes) = &args.routes {
        config.routes.gtfs_routes = Some(routes.clone());
    }

    if args.list_routes {
        list_routes(&config);
        return Ok(());
    }

    if args.ephemeral || config.storage.ephemeral {
        info!("Using in-memory state storage");
        run(MemoryBackend::new(), &config, &args)
    } else {
        let db_path = config
            .storage
            .path
            .clone()
            .unwrap_or_else(|| paths.sled_db_path());
        let backend = SledBackend::open(&db_path)
            .with_context(|| format!("Failed to open state database at {}", db_path.display()))?;
        run(backend, &config, &args)
    }
}

fn run<B: KeyValueBackend + 'static>(backend: B, config: &AppConfig, args: &Args) -> Result<()> {
    let store = Arc::new(PersistentStateStore::new(backend));
    let mut session = FilterSession::new(store, &config.storage.key, config.keys.cancel);

    if args.print_state {
        let state = session.state();
        let ids: Vec<String> = state.selection.iter().map(|id| id.to_string()).collect();
        println!("selection: [{}]", ids.join(", "));
        println!("enabled:   {}", state.enabled);
        return Ok(());
    }

    session.set_routes(config.routes.load_routes());

    if args.gui {
        route_filter::gui::run_gui(session)?;
    } else {
        Repl::new(session).run()?;
    }

    info!("Route Filter shutdown complete");
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists: {}", path.display());
    }

    AppConfig::default().save(path)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}

fn list_routes(config: &AppConfig) {
    let Some(routes) = config.routes.load_routes() else {
        println!("{}", "Route registry unavailable".yellow());
        return;
    };

    let categories = categorize(&routes);
    for (label, members) in [("Tramvaji", &categories.trams), ("Autobusi", &categories.buses)] {
        let ids: Vec<String> = members.iter().map(|id| id.to_string()).collect();
        println!("{} ({}): {}", label.bold(), members.len(), ids.join(" "));
    }
}
