//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::BackendConfig;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Recognition / upload backend
    pub backend: BackendSettings,
    /// Capture settings
    pub capture: CaptureSettings,
    /// Overlay settings
    pub overlay: OverlaySettings,
    /// Keyboard shortcuts
    pub shortcuts: ShortcutSettings,
}

/// View shown when the window opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartView {
    #[default]
    Scan,
    Gallery,
}

/// General application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// View shown on startup
    pub start_view: StartView,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the recognition and upload API
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        let defaults = BackendConfig::default();
        Self {
            base_url: defaults.base_url,
            request_timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

impl BackendSettings {
    pub fn to_backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

/// Capture-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Image file or directory used as the camera
    pub source: PathBuf,
    /// How often the source is checked for a newer image
    pub preview_refresh_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            preview_refresh_ms: 500,
        }
    }
}

/// Overlay-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Font size of the pinyin line on labels
    pub label_font_size: f32,
    /// Label background opacity (0.0 - 1.0)
    pub label_opacity: f32,
    /// Show the characters under the pinyin
    pub show_source_text: bool,
    /// Font with CJK coverage; a few system locations are tried when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            label_font_size: 14.0,
            label_opacity: 0.8,
            show_source_text: true,
            font_path: None,
        }
    }
}

/// Keyboard shortcuts, parsed with [`crate::hotkey::parse_shortcut`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutSettings {
    pub capture: String,
    pub continue_live: String,
    pub toggle_detail: String,
    pub save: String,
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self {
            capture: "Space".to_string(),
            continue_live: "Escape".to_string(),
            toggle_detail: "D".to_string(),
            save: "Ctrl+S".to_string(),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
