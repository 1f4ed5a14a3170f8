//! Signed-in session read from local storage
//!
//! The session file is written by the sign-in flow, which lives outside this
//! application. It is read once at startup and again only on explicit
//! refresh events, never per frame.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// File name of the session inside the data directory
pub const SESSION_FILE: &str = "session.json";

/// Identity used for backend requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "sessionToken", default)]
    pub token: Option<String>,
}

impl Session {
    /// Session with no user and no token
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Bearer token, if a non-empty one is present
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// User id sent with uploads; empty when signed out
    pub fn user_id_or_empty(&self) -> &str {
        self.user_id.as_deref().unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }
}

/// Reads the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the data directory
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(super::get_data_dir()?.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session. A missing file is an anonymous session.
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            warn!("No session at {:?}, continuing signed out", self.path);
            return Ok(Session::anonymous());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session file {:?}", self.path))?;
        let session: Session = serde_json::from_str(&content)
            .with_context(|| format!("invalid session file {:?}", self.path))?;
        debug!("Loaded session (authenticated: {})", session.is_authenticated());
        Ok(session)
    }

    /// Load the session, falling back to anonymous on any error
    pub fn load_or_anonymous(&self) -> Session {
        self.load().unwrap_or_else(|e| {
            error!("Failed to load session: {:#}", e);
            Session::anonymous()
        })
    }
}
