//! Application state shared between the views

use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::storage::{Gallery, Session};

/// How long a status message stays visible
pub const STATUS_DURATION: Duration = Duration::from_secs(4);

/// Central state shared by the scan and gallery views
#[derive(Debug, Clone, Default)]
pub struct SharedAppState {
    /// Application configuration
    pub config: AppConfig,
    /// Identity used for backend requests
    pub session: Session,
    /// Saved scans
    pub gallery: Gallery,
    /// Runtime state (not persisted)
    pub runtime: RuntimeState,
}

impl SharedAppState {
    /// Create a new shared state with the given configuration and session
    pub fn new(config: AppConfig, session: Session) -> Self {
        Self {
            config,
            session,
            gallery: Gallery::new(),
            runtime: RuntimeState::default(),
        }
    }
}

/// A transient message shown on the scan screen
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

impl StatusMessage {
    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() > STATUS_DURATION
    }
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Whether a save-to-gallery upload is running
    pub upload_in_flight: bool,
    /// Latest status message (if any)
    pub status: Option<StatusMessage>,
}

impl RuntimeState {
    /// Show an informational message
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    /// Show an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: error.into(),
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    /// Drop the status message once it has been shown long enough
    pub fn clear_expired_status(&mut self) {
        if self.status.as_ref().is_some_and(|s| s.is_expired()) {
            self.status = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status() {
        let mut runtime = RuntimeState::default();
        runtime.set_error("upload failed");

        let status = runtime.status.as_ref().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "upload failed");
    }

    #[test]
    fn test_fresh_status_is_kept() {
        let mut runtime = RuntimeState::default();
        runtime.set_status("saved");
        runtime.clear_expired_status();
        assert!(runtime.status.is_some());
    }

    #[test]
    fn test_expired_status_is_cleared() {
        let mut runtime = RuntimeState::default();
        runtime.status = Some(StatusMessage {
            text: "old".to_string(),
            is_error: false,
            shown_at: Instant::now() - STATUS_DURATION - Duration::from_millis(1),
        });
        runtime.clear_expired_status();
        assert!(runtime.status.is_none());
    }
}
