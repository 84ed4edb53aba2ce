//! Urban Pulse - analytics server for civic issue reports and city layers
//!
//! # Usage
//!
//! ```bash
//! # Serve the API on the default address with the sled store in ./data
//! cargo run --release
//!
//! # Load a generated dataset, then serve it
//! cargo run --bin simulation -- --days 14 --seed 7 > dataset.json
//! cargo run --release -- import dataset.json
//! cargo run --release -- serve --addr 127.0.0.1:8080
//! ```
//!
//! # Environment Variables
//!
//! - `URBAN_PULSE_CONFIG`: Path to the TOML analytics config
//! - `URBAN_PULSE_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `URBAN_PULSE_DATA_DIR`: sled data directory (default: ./data)
//! - `URBAN_PULSE_CORS_ORIGINS`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (default: info)
//! - `RESET_DB`: Set to "true" to wipe all persistent data on startup (for testing)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use urban_pulse::api::{create_app, DashboardState};
use urban_pulse::config::{self, AnalyticsConfig};
use urban_pulse::store::{self, SledStore};
use urban_pulse::types::Dataset;

/// sled database directory inside the data directory.
const DB_SUBDIR: &str = "analytics.db";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "urban-pulse")]
#[command(about = "Urban Pulse civic issue analytics server")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: server.addr from config)
    #[arg(short, long, global = true, env = "URBAN_PULSE_ADDR")]
    addr: Option<String>,

    /// Override the data directory (default: server.data_dir from config)
    #[arg(long, global = true, env = "URBAN_PULSE_DATA_DIR")]
    data_dir: Option<String>,

    /// Reset all persistent data on startup.
    /// WARNING: This is destructive and cannot be undone!
    /// Can also be set via RESET_DB=true environment variable.
    #[arg(long, global = true)]
    reset_db: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the HTTP API (default)
    Serve,

    /// Load a JSON dataset ({ measurements, issues }) into the store
    Import {
        /// Path to the dataset file
        path: PathBuf,
    },
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

// ============================================================================
// Database Reset
// ============================================================================

/// Check if database reset is requested via CLI flag or environment variable.
fn should_reset_db(cli_flag: bool) -> bool {
    if cli_flag {
        return true;
    }
    if let Ok(val) = std::env::var("RESET_DB") {
        let val_lower = val.to_lowercase();
        return val_lower == "true" || val_lower == "1" || val_lower == "yes";
    }
    false
}

/// Remove the data directory and all its contents.
fn reset_data_directory(data_dir: &Path) -> Result<()> {
    if !data_dir.exists() {
        info!("Data directory does not exist, nothing to reset");
        return Ok(());
    }

    warn!("RESET_DB set: wiping persistent data in {}", data_dir.display());
    if let Ok(entries) = std::fs::read_dir(data_dir) {
        for entry in entries.flatten() {
            warn!("  removing {}", entry.path().display());
        }
    }
    std::fs::remove_dir_all(data_dir).context("Failed to remove data directory")?;
    info!("Data directory removed, a fresh store will be created");
    Ok(())
}

fn open_store(data_dir: &Path) -> Result<Arc<SledStore>> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let store = SledStore::open(data_dir.join(DB_SUBDIR))
        .with_context(|| format!("Failed to open store in {}", data_dir.display()))?;
    let (measurements, issues) = store.stats();
    info!(measurements, issues, "Store ready");
    Ok(Arc::new(store))
}

// ============================================================================
// Commands
// ============================================================================

async fn run_import(path: &Path, data_dir: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let dataset: Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
    if dataset.is_empty() {
        warn!(path = %path.display(), "Dataset is empty, nothing to import");
        return Ok(());
    }

    let db = open_store(data_dir)?;
    let (measurements, issues) = store::import_dataset(&*db, &dataset)
        .await
        .context("Import failed")?;
    db.flush().context("Failed to flush store")?;
    info!(measurements, issues, "Import complete");
    Ok(())
}

async fn run_server(data_dir: &Path, cancel_token: CancellationToken) -> Result<()> {
    let config = config::get();
    let db = open_store(data_dir)?;
    let addr = config.server.addr.clone();

    let state = DashboardState::new(db.clone(), config);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("HTTP server listening on http://{}/api/v1", addr);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    if let Err(e) = db.flush() {
        error!("Failed to flush store on shutdown: {}", e);
    }

    match result {
        Ok(()) => {
            info!("[HttpServer] Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("[HttpServer] Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let mut analytics_config = AnalyticsConfig::load();
    if let Some(addr) = args.addr {
        analytics_config.server.addr = addr;
    }
    if let Some(dir) = args.data_dir {
        analytics_config.server.data_dir = dir;
    }
    info!(
        city = %analytics_config.city.name,
        region = %analytics_config.city.region,
        "Urban Pulse {}",
        env!("CARGO_PKG_VERSION")
    );
    config::init(analytics_config.clone());

    let data_dir = PathBuf::from(&analytics_config.server.data_dir);

    // Reset before any storage is opened
    if should_reset_db(args.reset_db) {
        reset_data_directory(&data_dir)?;
    }

    match args.command {
        Some(SubCommand::Import { path }) => run_import(&path, &data_dir).await?,
        Some(SubCommand::Serve) | None => {
            // Graceful shutdown via Ctrl+C
            let cancel_token = CancellationToken::new();
            let shutdown_token = cancel_token.clone();
            tokio::spawn(async move {
                tokio::signal::ctrl_c().await.ok();
                info!("Received Ctrl+C, initiating shutdown...");
                shutdown_token.cancel();
            });

            run_server(&data_dir, cancel_token).await?;
        }
    }

    info!("Urban Pulse shutdown complete");
    Ok(())
}
