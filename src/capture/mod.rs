//! Capture Surface
//!
//! The "camera" of the scan screen. A surface streams a live preview,
//! freezes a still frame on capture and resumes the preview on request.
//! The desktop surface reads images from a source file or directory, so a
//! phone camera sync folder or a screenshot folder can act as the camera.

pub mod frame;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CaptureSettings;
use frame::CapturedFrame;

/// Image extensions the source surface will pick up
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Errors raised by a capture surface
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera access has not been granted")]
    PermissionDenied,
    #[error("no frame available from {0}")]
    NoFrame(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode frame: {0}")]
    Encode(#[source] image::ImageError),
    #[error("frame buffer of {len} bytes does not match {width}x{height}")]
    InvalidFrame { width: u32, height: u32, len: usize },
}

/// Access state of the capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not requested yet
    #[default]
    Undetermined,
}

/// A device that can stream a preview and freeze a still frame
pub trait CaptureSurface {
    /// Current permission state, without prompting
    fn permission(&self) -> PermissionState;

    /// Ask for access and return the resulting state
    fn request_permission(&mut self) -> PermissionState;

    /// Latest frame to show. While a still is held this is the still.
    fn live_frame(&mut self) -> Option<&CapturedFrame>;

    /// Freeze the preview and return the still frame
    fn capture_still(&mut self) -> Result<CapturedFrame, CaptureError>;

    /// Drop the still frame and go back to streaming
    fn resume_live_preview(&mut self);

    /// Whether the preview is currently frozen on a still
    #[cfg(test)]
    fn is_paused(&self) -> bool;
}

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Image file, or directory whose newest image is the preview
    pub source: PathBuf,
    /// How often the source is re-scanned for a newer image
    pub refresh_interval: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("."),
            refresh_interval: Duration::from_millis(500),
        }
    }
}

impl From<&CaptureSettings> for CaptureConfig {
    fn from(settings: &CaptureSettings) -> Self {
        Self {
            source: settings.source.clone(),
            refresh_interval: Duration::from_millis(settings.preview_refresh_ms),
        }
    }
}

/// Identity of the file a preview frame was decoded from
#[derive(Debug, Clone, PartialEq)]
struct SourceStamp {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
}

/// Capture surface backed by an image file or a directory of images
pub struct ImageSourceSurface {
    config: CaptureConfig,
    permission: PermissionState,
    current: Option<CapturedFrame>,
    current_source: Option<SourceStamp>,
    /// Newest file that failed to decode; skipped until it changes
    failed_source: Option<SourceStamp>,
    last_poll: Option<Instant>,
    paused: bool,
}

impl ImageSourceSurface {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            permission: PermissionState::Undetermined,
            current: None,
            current_source: None,
            failed_source: None,
            last_poll: None,
            paused: false,
        }
    }

    pub fn source(&self) -> &Path {
        &self.config.source
    }

    /// Re-scan the source if the refresh interval elapsed
    fn poll(&mut self, force: bool) {
        if self.paused || self.permission != PermissionState::Granted {
            return;
        }
        if !force {
            if let Some(last) = self.last_poll {
                if last.elapsed() < self.config.refresh_interval {
                    return;
                }
            }
        }
        self.last_poll = Some(Instant::now());

        let Some(stamp) = newest_image(&self.config.source) else {
            return;
        };

        if self.current_source.as_ref() == Some(&stamp)
            || self.failed_source.as_ref() == Some(&stamp)
        {
            return;
        }

        match load_frame(&stamp.path) {
            Ok(frame) => {
                debug!("Preview frame {}x{} from {:?}", frame.width, frame.height, stamp.path);
                self.current = Some(frame);
                self.current_source = Some(stamp);
                self.failed_source = None;
            }
            Err(e) => {
                warn!("Skipping preview source: {}", e);
                self.failed_source = Some(stamp);
            }
        }
    }
}

impl CaptureSurface for ImageSourceSurface {
    fn permission(&self) -> PermissionState {
        self.permission
    }

    fn request_permission(&mut self) -> PermissionState {
        let readable = match std::fs::metadata(&self.config.source) {
            Ok(meta) if meta.is_dir() => std::fs::read_dir(&self.config.source).is_ok(),
            Ok(_) => std::fs::File::open(&self.config.source).is_ok(),
            Err(_) => false,
        };

        self.permission = if readable {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        info!("Capture source {:?}: {:?}", self.config.source, self.permission);
        self.permission
    }

    fn live_frame(&mut self) -> Option<&CapturedFrame> {
        self.poll(false);
        self.current.as_ref()
    }

    fn capture_still(&mut self) -> Result<CapturedFrame, CaptureError> {
        if self.permission != PermissionState::Granted {
            return Err(CaptureError::PermissionDenied);
        }
        if self.current.is_none() {
            self.poll(true);
        }
        let frame = self
            .current
            .clone()
            .ok_or_else(|| CaptureError::NoFrame(self.config.source.clone()))?;

        self.paused = true;
        info!("Captured still frame {}x{}", frame.width, frame.height);
        Ok(frame)
    }

    fn resume_live_preview(&mut self) {
        if self.paused {
            debug!("Resuming live preview");
        }
        self.paused = false;
        self.last_poll = None;
    }

    #[cfg(test)]
    fn is_paused(&self) -> bool {
        self.paused
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Find the image to preview: the source itself, or the most recently
/// modified image in the source directory
fn newest_image(source: &Path) -> Option<SourceStamp> {
    let meta = std::fs::metadata(source).ok()?;
    if !meta.is_dir() {
        return Some(SourceStamp {
            path: source.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        });
    }

    std::fs::read_dir(source)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_path(path))
        .filter_map(|path| {
            let meta = std::fs::metadata(&path).ok()?;
            Some(SourceStamp {
                modified: meta.modified().ok(),
                len: meta.len(),
                path,
            })
        })
        .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)))
}

fn load_frame(path: &Path) -> Result<CapturedFrame, CaptureError> {
    let image = image::open(path).map_err(|source| CaptureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CapturedFrame::from_image(image.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn surface_for(source: &Path) -> ImageSourceSurface {
        ImageSourceSurface::new(CaptureConfig {
            source: source.to_path_buf(),
            refresh_interval: Duration::ZERO,
        })
    }

    #[test]
    fn test_permission_starts_undetermined() {
        let dir = TempDir::new().unwrap();
        let surface = surface_for(dir.path());
        assert_eq!(surface.permission(), PermissionState::Undetermined);
    }

    #[test]
    fn test_permission_denied_for_missing_source() {
        let mut surface = surface_for(Path::new("/nonexistent/camera/roll"));
        assert_eq!(surface.request_permission(), PermissionState::Denied);
        assert!(matches!(surface.capture_still(), Err(CaptureError::PermissionDenied)));
    }

    #[test]
    fn test_capture_single_file() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "sign.png", 8, 5);
        let mut surface = surface_for(&path);

        assert_eq!(surface.request_permission(), PermissionState::Granted);
        let frame = surface.capture_still().unwrap();

        assert_eq!(frame.dimensions(), (8, 5));
        assert!(surface.is_paused());
    }

    #[test]
    fn test_directory_preview_ignores_non_images() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        write_png(dir.path(), "menu.png", 3, 7);
        let mut surface = surface_for(dir.path());
        surface.request_permission();

        let frame = surface.live_frame().unwrap();
        assert_eq!(frame.dimensions(), (3, 7));
    }

    #[test]
    fn test_empty_directory_has_no_frame() {
        let dir = TempDir::new().unwrap();
        let mut surface = surface_for(dir.path());
        surface.request_permission();

        assert!(surface.live_frame().is_none());
        assert!(matches!(surface.capture_still(), Err(CaptureError::NoFrame(_))));
        assert!(!surface.is_paused());
    }

    #[test]
    fn test_still_holds_until_resumed() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "frame.png", 4, 4);
        let mut surface = surface_for(&path);
        surface.request_permission();
        surface.capture_still().unwrap();

        // Replace the source while paused; the still must not change
        write_png(dir.path(), "frame.png", 9, 9);
        assert_eq!(surface.live_frame().unwrap().dimensions(), (4, 4));

        surface.resume_live_preview();
        assert!(!surface.is_paused());
        assert_eq!(surface.live_frame().unwrap().dimensions(), (9, 9));
    }

    #[test]
    fn test_undecodable_image_is_skipped_until_it_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let mut surface = surface_for(&path);
        surface.request_permission();

        assert!(surface.live_frame().is_none());
        let failed = surface.failed_source.clone().unwrap();
        assert_eq!(failed.path, path);

        // Same file on the next poll: not retried
        assert!(surface.live_frame().is_none());
        assert_eq!(surface.failed_source, Some(failed));

        write_png(dir.path(), "broken.png", 6, 2);
        assert_eq!(surface.live_frame().unwrap().dimensions(), (6, 2));
        assert!(surface.failed_source.is_none());
    }

    #[test]
    fn test_image_extension_filter() {
        assert!(is_image_path(Path::new("a/b/photo.JPG")));
        assert!(is_image_path(Path::new("scan.webp")));
        assert!(!is_image_path(Path::new("scan.pdf")));
        assert!(!is_image_path(Path::new("README")));
    }
}
