//! Storage Layer
//!
//! Resolves the platform directories and holds the small amount of local
//! state the scanner reads: the signed-in session and the gallery list.

pub mod gallery;
pub mod session;

use anyhow::Result;
use std::path::PathBuf;

pub use gallery::Gallery;
pub use session::{Session, SessionStore};

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "pinyinscan", "PinyinScan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = project_dirs()?.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = project_dirs()?.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}
