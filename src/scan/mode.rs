//! Mode Controller
//!
//! Single source of truth for what the scan screen shows: the live preview,
//! a captured still waiting for recognition, or the results overlay.

use tracing::{debug, info, warn};

use crate::capture::frame::CapturedFrame;
use crate::capture::{CaptureError, CaptureSurface};
use crate::recognition::{joined_source_text, DetectedRegion};
use crate::scan::layout::{layout_labels, LabelPlacement};
use crate::scan::mapper::{FrameDimensions, ViewportDimensions};

/// Which UI the scan screen is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Camera preview streaming
    #[default]
    Live,
    /// Frame frozen, waiting for recognition
    StillCaptured,
    /// Labels overlaid on the still
    ResultsShown,
}

/// How results are presented while in [`Mode::ResultsShown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsView {
    /// Labels positioned over the detected text
    #[default]
    Overlay,
    /// Plain list of every region
    Detail,
}

/// A still frame handed to the recognition service
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Tag matching the eventual result back to this capture
    pub scan_id: u64,
    pub frame: CapturedFrame,
}

/// State machine for the scan screen
#[derive(Debug, Default)]
pub struct ModeController {
    mode: Mode,
    results_view: ResultsView,
    frame: Option<FrameDimensions>,
    still: Option<CapturedFrame>,
    regions: Vec<DetectedRegion>,
    error: Option<String>,
    scan_id: u64,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn results_view(&self) -> ResultsView {
        self.results_view
    }

    pub fn frame_dimensions(&self) -> Option<FrameDimensions> {
        self.frame
    }

    pub fn still_frame(&self) -> Option<&CapturedFrame> {
        self.still.as_ref()
    }

    pub fn regions(&self) -> &[DetectedRegion] {
        &self.regions
    }

    /// Recognition error for the current still, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Text saved alongside the scan when uploading
    pub fn recognition_text(&self) -> String {
        joined_source_text(&self.regions)
    }

    /// LIVE -> STILL_CAPTURED.
    ///
    /// Returns `Ok(None)` when not in live mode. On a capture error the
    /// controller stays live.
    pub fn capture(
        &mut self,
        surface: &mut dyn CaptureSurface,
    ) -> Result<Option<ScanRequest>, CaptureError> {
        if self.mode != Mode::Live {
            debug!("Ignoring capture in {:?}", self.mode);
            return Ok(None);
        }

        let frame = surface.capture_still()?;
        self.scan_id += 1;
        self.frame = Some(frame.frame_dimensions());
        self.still = Some(frame.clone());
        self.error = None;
        self.mode = Mode::StillCaptured;
        info!("Scan {} captured, awaiting recognition", self.scan_id);

        Ok(Some(ScanRequest {
            scan_id: self.scan_id,
            frame,
        }))
    }

    /// STILL_CAPTURED -> RESULTS_SHOWN.
    ///
    /// Results for a different scan, or arriving outside STILL_CAPTURED, are
    /// stale and dropped. Regions without vertices are rejected.
    pub fn results_arrived(&mut self, scan_id: u64, regions: Vec<DetectedRegion>) -> bool {
        if self.mode != Mode::StillCaptured || scan_id != self.scan_id {
            debug!(
                "Dropping stale results for scan {} (current {}, {:?})",
                scan_id, self.scan_id, self.mode
            );
            return false;
        }

        let total = regions.len();
        self.regions = regions
            .into_iter()
            .filter(|region| {
                if region.is_positionable() {
                    true
                } else {
                    warn!("Rejecting region {} without vertices", region.id);
                    false
                }
            })
            .collect();

        info!(
            "Scan {} recognized {} regions ({} rejected)",
            scan_id,
            self.regions.len(),
            total - self.regions.len()
        );
        self.results_view = ResultsView::Overlay;
        self.mode = Mode::ResultsShown;
        true
    }

    /// Record a recognition failure. The controller stays in STILL_CAPTURED.
    pub fn recognition_failed(&mut self, scan_id: u64, message: impl Into<String>) -> bool {
        if self.mode != Mode::StillCaptured || scan_id != self.scan_id {
            return false;
        }
        self.error = Some(message.into());
        true
    }

    /// Back to the live preview from a still or the results
    pub fn continue_live(&mut self, surface: &mut dyn CaptureSurface) {
        surface.resume_live_preview();
        self.reset();
    }

    /// The screen regained focus: always back to live, nothing carried over
    pub fn focus_gained(&mut self, surface: &mut dyn CaptureSurface) {
        if self.mode != Mode::Live {
            info!("Focus regained in {:?}, resetting to live", self.mode);
        }
        surface.resume_live_preview();
        self.reset();
    }

    /// Switch between the overlay and the detail list
    pub fn toggle_detail_view(&mut self) {
        if self.mode != Mode::ResultsShown {
            return;
        }
        self.results_view = match self.results_view {
            ResultsView::Overlay => ResultsView::Detail,
            ResultsView::Detail => ResultsView::Overlay,
        };
    }

    /// Labels for this render pass. Empty unless the overlay is showing.
    pub fn label_placements(&self, viewport: ViewportDimensions) -> Vec<LabelPlacement<'_>> {
        if self.mode != Mode::ResultsShown || self.results_view != ResultsView::Overlay {
            return Vec::new();
        }
        layout_labels(&self.regions, self.frame, viewport)
    }

    fn reset(&mut self) {
        self.mode = Mode::Live;
        self.results_view = ResultsView::Overlay;
        self.frame = None;
        self.still = None;
        self.regions.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PermissionState;
    use crate::recognition::region::Vertex;

    /// Surface that always captures a fixed-size frame
    #[derive(Default)]
    struct FakeSurface {
        frame: Option<CapturedFrame>,
        paused: bool,
        resumed: usize,
        fail: bool,
    }

    impl FakeSurface {
        fn with_frame(width: u32, height: u32) -> Self {
            Self {
                frame: Some(CapturedFrame::new(vec![0; (width * height * 4) as usize], width, height)),
                ..Default::default()
            }
        }
    }

    impl CaptureSurface for FakeSurface {
        fn permission(&self) -> PermissionState {
            PermissionState::Granted
        }

        fn request_permission(&mut self) -> PermissionState {
            PermissionState::Granted
        }

        fn live_frame(&mut self) -> Option<&CapturedFrame> {
            self.frame.as_ref()
        }

        fn capture_still(&mut self) -> Result<CapturedFrame, CaptureError> {
            if self.fail {
                return Err(CaptureError::PermissionDenied);
            }
            self.paused = true;
            Ok(self.frame.clone().unwrap())
        }

        fn resume_live_preview(&mut self) {
            self.paused = false;
            self.resumed += 1;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    fn regions(n: usize) -> Vec<DetectedRegion> {
        (0..n)
            .map(|i| DetectedRegion {
                id: i.to_string(),
                source_text: format!("字{}", i),
                transliteration: "zì".to_string(),
                translation: "character".to_string(),
                vertices: vec![Vertex { x: i as f32 * 10.0, y: 20.0 }],
            })
            .collect()
    }

    fn viewport() -> ViewportDimensions {
        ViewportDimensions::new(1080.0, 2220.0)
    }

    #[test]
    fn test_starts_live_without_labels() {
        let controller = ModeController::new();
        assert_eq!(controller.mode(), Mode::Live);
        assert!(controller.label_placements(viewport()).is_empty());
        assert!(controller.frame_dimensions().is_none());
    }

    #[test]
    fn test_full_scan_cycle_renders_one_label_per_region() {
        let mut surface = FakeSurface::with_frame(1080, 1920);
        let mut controller = ModeController::new();

        let request = controller.capture(&mut surface).unwrap().unwrap();
        assert_eq!(controller.mode(), Mode::StillCaptured);
        assert_eq!(controller.frame_dimensions(), Some(FrameDimensions::new(1080.0, 1920.0)));
        assert!(controller.label_placements(viewport()).is_empty());

        assert!(controller.results_arrived(request.scan_id, regions(4)));
        assert_eq!(controller.mode(), Mode::ResultsShown);
        assert_eq!(controller.label_placements(viewport()).len(), 4);
    }

    #[test]
    fn test_continue_clears_labels_and_resumes_preview() {
        let mut surface = FakeSurface::with_frame(100, 100);
        let mut controller = ModeController::new();
        let request = controller.capture(&mut surface).unwrap().unwrap();
        controller.results_arrived(request.scan_id, regions(3));

        controller.continue_live(&mut surface);

        assert_eq!(controller.mode(), Mode::Live);
        assert!(controller.regions().is_empty());
        assert!(controller.label_placements(viewport()).is_empty());
        assert_eq!(surface.resumed, 1);
        assert!(!surface.is_paused());
    }

    #[test]
    fn test_focus_gain_resets_from_every_mode() {
        for steps in 0..3 {
            let mut surface = FakeSurface::with_frame(50, 50);
            let mut controller = ModeController::new();
            if steps >= 1 {
                controller.capture(&mut surface).unwrap();
            }
            if steps >= 2 {
                controller.results_arrived(1, regions(2));
                controller.toggle_detail_view();
            }

            controller.focus_gained(&mut surface);

            assert_eq!(controller.mode(), Mode::Live);
            assert_eq!(controller.results_view(), ResultsView::Overlay);
            assert!(controller.regions().is_empty());
            assert!(controller.still_frame().is_none());
            assert!(controller.frame_dimensions().is_none());
            assert!(!surface.is_paused());
        }
    }

    #[test]
    fn test_capture_ignored_outside_live() {
        let mut surface = FakeSurface::with_frame(10, 10);
        let mut controller = ModeController::new();
        controller.capture(&mut surface).unwrap();

        assert!(controller.capture(&mut surface).unwrap().is_none());
        assert_eq!(controller.mode(), Mode::StillCaptured);
    }

    #[test]
    fn test_capture_error_stays_live() {
        let mut surface = FakeSurface {
            fail: true,
            ..FakeSurface::with_frame(10, 10)
        };
        let mut controller = ModeController::new();

        assert!(controller.capture(&mut surface).is_err());
        assert_eq!(controller.mode(), Mode::Live);
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut surface = FakeSurface::with_frame(10, 10);
        let mut controller = ModeController::new();
        let first = controller.capture(&mut surface).unwrap().unwrap();
        controller.focus_gained(&mut surface);
        let second = controller.capture(&mut surface).unwrap().unwrap();

        assert!(!controller.results_arrived(first.scan_id, regions(1)));
        assert_eq!(controller.mode(), Mode::StillCaptured);
        assert!(controller.results_arrived(second.scan_id, regions(1)));
    }

    #[test]
    fn test_results_while_live_are_dropped() {
        let mut controller = ModeController::new();
        assert!(!controller.results_arrived(0, regions(2)));
        assert_eq!(controller.mode(), Mode::Live);
        assert!(controller.regions().is_empty());
    }

    #[test]
    fn test_regions_without_vertices_are_rejected() {
        let mut surface = FakeSurface::with_frame(10, 10);
        let mut controller = ModeController::new();
        let request = controller.capture(&mut surface).unwrap().unwrap();
        let mut batch = regions(3);
        batch[1].vertices.clear();

        controller.results_arrived(request.scan_id, batch);

        let ids: Vec<_> = controller.regions().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["0", "2"]);
        assert_eq!(controller.label_placements(viewport()).len(), 2);
    }

    #[test]
    fn test_recognition_failure_stays_captured() {
        let mut surface = FakeSurface::with_frame(10, 10);
        let mut controller = ModeController::new();
        let request = controller.capture(&mut surface).unwrap().unwrap();

        assert!(controller.recognition_failed(request.scan_id, "service unavailable"));

        assert_eq!(controller.mode(), Mode::StillCaptured);
        assert_eq!(controller.error(), Some("service unavailable"));

        controller.continue_live(&mut surface);
        assert!(controller.error().is_none());
    }

    #[test]
    fn test_detail_view_hides_labels() {
        let mut surface = FakeSurface::with_frame(10, 10);
        let mut controller = ModeController::new();
        let request = controller.capture(&mut surface).unwrap().unwrap();
        controller.results_arrived(request.scan_id, regions(2));

        controller.toggle_detail_view();
        assert_eq!(controller.results_view(), ResultsView::Detail);
        assert!(controller.label_placements(viewport()).is_empty());

        controller.toggle_detail_view();
        assert_eq!(controller.label_placements(viewport()).len(), 2);
    }

    #[test]
    fn test_toggle_ignored_outside_results() {
        let mut controller = ModeController::new();
        controller.toggle_detail_view();
        assert_eq!(controller.results_view(), ResultsView::Overlay);
    }

    #[test]
    fn test_recognition_text_joins_regions() {
        let mut surface = FakeSurface::with_frame(10, 10);
        let mut controller = ModeController::new();
        let request = controller.capture(&mut surface).unwrap().unwrap();
        controller.results_arrived(request.scan_id, regions(2));

        assert_eq!(controller.recognition_text(), "字0,字1");
    }
}
