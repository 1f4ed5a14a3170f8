//! PinyinScan - point a camera at Chinese text and read it with pinyin
//!
//! Captures a still from the camera source, sends it to the recognition
//! backend and overlays pinyin labels on the text regions it finds.

mod app;
mod backend;
mod capture;
mod config;
mod dashboard;
mod hotkey;
mod overlay;
mod recognition;
mod scan;
mod shared;
mod storage;
mod upload;

use anyhow::Result;
use clap::Parser;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::ScanServices;
use crate::config::AppConfig;
use crate::shared::SharedAppState;
use crate::storage::{Session, SessionStore};

/// PinyinScan - camera text scanner with pinyin overlay
#[derive(Parser, Debug)]
#[command(name = "pinyin-scan")]
#[command(about = "Scan Chinese text and overlay pinyin and translations")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image file or directory to use as the camera
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Backend base URL
    #[arg(short, long)]
    backend: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("PinyinScan starting...");

    // Load or create configuration
    let mut config = load_or_create_config(args.config.as_deref());
    if let Some(source) = args.source {
        config.capture.source = source;
    }
    if let Some(backend) = args.backend {
        config.backend.base_url = backend;
    }

    let session_store = match SessionStore::default_location() {
        Ok(store) => {
            info!("Session file: {:?}", store.path());
            Some(store)
        }
        Err(e) => {
            warn!("No session location available: {}", e);
            None
        }
    };
    let session = session_store
        .as_ref()
        .map(SessionStore::load_or_anonymous)
        .unwrap_or_else(Session::anonymous);

    let services = ScanServices::from_backend(&config.backend.to_backend_config())?;

    // Create shared state
    let shared_state = Arc::new(RwLock::new(SharedAppState::new(config, session)));

    // Run the dashboard (blocking)
    if let Err(e) = dashboard::app::run_dashboard(shared_state, services, session_store) {
        error!("Dashboard error: {}", e);
    }

    info!("PinyinScan shutdown complete");

    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config(explicit: Option<&Path>) -> AppConfig {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match storage::get_config_dir() {
            Ok(dir) => dir.join("config.toml"),
            Err(e) => {
                warn!("No config directory: {}", e);
                return AppConfig::default();
            }
        },
    };

    if config_path.exists() {
        match config::load_config(&config_path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
            Err(e) => warn!("Ignoring invalid configuration {:?}: {}", config_path, e),
        }
    } else {
        let config = AppConfig::default();
        match config::save_config(&config, &config_path) {
            Ok(()) => info!("Wrote default configuration to {:?}", config_path),
            Err(e) => warn!("Could not write default configuration: {}", e),
        }
        return config;
    }

    info!("Using default configuration");
    AppConfig::default()
}
