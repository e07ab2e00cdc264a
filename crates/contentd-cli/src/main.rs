#![deny(unsafe_code)]

//! contentd CLI — serve and query the content search service.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use contentd_config::AppConfig;
use contentd_core::http::client::ContentClient;
use contentd_core::http::server::{self, ServerState, ShutdownSignal};
use contentd_core::http::types::SearchRequest;
use contentd_core::record::RecordStore;
use contentd_core::rpc::stdio::serve_stdio;
use contentd_core::search::{SearchFilter, search};
use contentd_core::tools::ToolRegistry;

/// contentd — attribute-filtered content search over HTTP and stdio.
#[derive(Parser)]
#[command(name = "contentd", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "contentd.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve,

    /// Run the JSON-RPC transport on stdin/stdout.
    Stdio,

    /// Search the record store.
    Search {
        /// Restrict to these class labels (repeatable).
        #[arg(long = "class")]
        classes: Vec<String>,

        /// Attribute constraint as `name=value[,value...]` (repeatable).
        /// Prefix a value with '>' or '<' for numeric comparison.
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Maximum number of records to return (0 = unbounded).
        #[arg(long)]
        limit: Option<usize>,

        /// Query a running server instead of the local store.
        #[arg(long)]
        server: Option<String>,
    },

    /// List registered tools.
    Tools,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing subscriber with verbosity level
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Serve => cmd_serve(&cli.config).await?,
        Commands::Stdio => cmd_stdio(&cli.config).await?,
        Commands::Search {
            classes,
            filters,
            limit,
            server,
        } => cmd_search(&cli.config, classes, filters, limit, server).await?,
        Commands::Tools => cmd_tools(),
        Commands::Config { show } => cmd_config(&cli.config, show).await?,
    }

    Ok(())
}

async fn cmd_serve(config_path: &Path) -> Result<()> {
    let config = load_config(config_path).await?;
    let store = Arc::new(load_store(&config).await?);
    let registry = Arc::new(ToolRegistry::with_defaults());
    info!(records = store.len(), "starting contentd HTTP server");

    let state = Arc::new(ServerState::new(store, registry, &config));
    let listener = server::bind(&config).await.context("failed to bind listener")?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, initiating graceful shutdown");
            let _ = shutdown_tx.send(ShutdownSignal);
        }
    });

    server::serve(listener, state, shutdown_rx).await?;
    Ok(())
}

async fn cmd_stdio(config_path: &Path) -> Result<()> {
    let config = load_config(config_path).await?;
    let store = Arc::new(load_store(&config).await?);
    let registry = Arc::new(ToolRegistry::with_defaults());

    serve_stdio(registry, store).await?;
    Ok(())
}

async fn cmd_search(
    config_path: &Path,
    classes: Vec<String>,
    filters: Vec<String>,
    limit: Option<usize>,
    server: Option<String>,
) -> Result<()> {
    let constraints = parse_filters(&filters)?;

    if let Some(base_url) = server {
        let client = ContentClient::new(base_url);
        let request = SearchRequest {
            classes,
            filters: constraints,
            limit,
        };
        let results = client.search(&request).await?;
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let config = load_config(config_path).await?;
    let store = load_store(&config).await?;
    let filter = SearchFilter {
        classes,
        filters: constraints,
        limit,
    };
    let results = search(&store, &filter);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn cmd_tools() {
    let registry = ToolRegistry::with_defaults();
    for spec in registry.list() {
        println!("{:<20} {}", spec.name, spec.description);
    }
}

async fn cmd_config(config_path: &Path, show: bool) -> Result<()> {
    let config = load_config(config_path).await?;
    if show {
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::load(path).await.map_err(|e| anyhow::anyhow!(e))
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load the record store named in the config, or the sample set.
async fn load_store(config: &AppConfig) -> Result<RecordStore> {
    match &config.store.records_path {
        Some(path) => RecordStore::load(Path::new(path))
            .await
            .with_context(|| format!("failed to load records from '{path}'")),
        None => {
            info!("no records_path configured, using sample records");
            Ok(RecordStore::sample())
        }
    }
}

/// Parse `name=value[,value...]` constraint arguments.
fn parse_filters(args: &[String]) -> Result<BTreeMap<String, Vec<String>>> {
    let mut filters = BTreeMap::new();
    for arg in args {
        let (name, values) = arg
            .split_once('=')
            .with_context(|| format!("invalid filter '{arg}', expected name=value"))?;
        if name.is_empty() {
            anyhow::bail!("invalid filter '{arg}', empty attribute name");
        }
        let values: Vec<String> = values.split(',').map(str::to_string).collect();
        // repeated --filter flags for the same attribute extend the value list
        filters
            .entry(name.to_string())
            .or_insert_with(Vec::new)
            .extend(values);
    }
    Ok(filters)
}
