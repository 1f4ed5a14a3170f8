//! Scan view - camera preview, capture and the results overlay

use egui::{Align2, Color32, ColorImage, FontId, Id, Order, Pos2, Rect, RichText, Rounding, Sense, TextureHandle, TextureOptions, Vec2};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::app::ScanServices;
use crate::capture::frame::CapturedFrame;
use crate::capture::{CaptureSurface, PermissionState};
use crate::config::OverlaySettings;
use crate::dashboard::theme::{color_with_alpha, ThemeColors};
use crate::hotkey::ShortcutAction;
use crate::overlay::widgets::{ControlStyle, LabelStyle};
use crate::overlay::{render_controls, render_detail_table, render_labels, OverlayAction};
use crate::recognition::DetectedRegion;
use crate::scan::{Mode, ModeController, ResultsView, ViewportDimensions};
use crate::shared::SharedAppState;

/// How often the live preview is repainted to pick up new frames
const PREVIEW_REPAINT: Duration = Duration::from_millis(200);

/// Something the user asked the scan screen to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    RequestPermission,
    Capture,
    ContinueLive,
    ToggleDetail,
    Save,
}

impl From<ShortcutAction> for ScanAction {
    fn from(action: ShortcutAction) -> Self {
        match action {
            ShortcutAction::Capture => ScanAction::Capture,
            ShortcutAction::ContinueLive => ScanAction::ContinueLive,
            ShortcutAction::ToggleDetail => ScanAction::ToggleDetail,
            ShortcutAction::Save => ScanAction::Save,
        }
    }
}

impl From<OverlayAction> for ScanAction {
    fn from(action: OverlayAction) -> Self {
        match action {
            OverlayAction::ContinueLive => ScanAction::ContinueLive,
            OverlayAction::ToggleDetail => ScanAction::ToggleDetail,
        }
    }
}

/// The scan screen: owns the capture surface and the mode controller
pub struct ScanScreen {
    surface: Box<dyn CaptureSurface>,
    controller: ModeController,
    /// Texture of the frame on screen, keyed by the frame timestamp
    texture: Option<(Instant, TextureHandle)>,
    label_style: LabelStyle,
    control_style: ControlStyle,
}

impl ScanScreen {
    pub fn new(surface: Box<dyn CaptureSurface>, overlay: &OverlaySettings) -> Self {
        Self {
            surface,
            controller: ModeController::new(),
            texture: None,
            label_style: LabelStyle::from(overlay),
            control_style: ControlStyle::default(),
        }
    }

    /// The screen came into focus: drop anything left from before
    pub fn focus_gained(&mut self) {
        self.controller.focus_gained(self.surface.as_mut());
        self.texture = None;
    }

    /// Recognition finished for a capture
    pub fn recognition_finished(&mut self, scan_id: u64, result: Result<Vec<DetectedRegion>, String>) {
        match result {
            Ok(regions) => {
                self.controller.results_arrived(scan_id, regions);
            }
            Err(message) => {
                self.controller
                    .recognition_failed(scan_id, format!("Recognition failed: {}", message));
            }
        }
    }

    /// Apply a user action
    pub fn apply(
        &mut self,
        action: ScanAction,
        services: &ScanServices,
        shared_state: &Arc<RwLock<SharedAppState>>,
    ) {
        match action {
            ScanAction::RequestPermission => {
                self.surface.request_permission();
            }
            ScanAction::Capture => match self.controller.capture(self.surface.as_mut()) {
                Ok(Some(request)) => {
                    let session = shared_state.read().session.clone();
                    services.spawn_recognition(request, session);
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Capture failed: {}", e);
                    shared_state.write().runtime.set_error(format!("Capture failed: {}", e));
                }
            },
            ScanAction::ContinueLive => {
                if self.controller.mode() != Mode::Live {
                    self.controller.continue_live(self.surface.as_mut());
                }
            }
            ScanAction::ToggleDetail => self.controller.toggle_detail_view(),
            ScanAction::Save => self.save(services, shared_state),
        }
    }

    /// Upload the current still and its text to the gallery
    fn save(&self, services: &ScanServices, shared_state: &Arc<RwLock<SharedAppState>>) {
        if self.controller.mode() != Mode::ResultsShown {
            return;
        }
        let Some(frame) = self.controller.still_frame().cloned() else {
            return;
        };

        let mut state = shared_state.write();
        if state.runtime.upload_in_flight {
            return;
        }
        info!("Saving scan with {} regions", self.controller.regions().len());
        services.spawn_upload(frame, state.session.clone(), self.controller.recognition_text());
        state.runtime.upload_in_flight = true;
        state.runtime.set_status("Saving to gallery...");
    }

    /// Render the scan view and return the actions the user took
    pub fn show(&mut self, ui: &mut egui::Ui, shared_state: &Arc<RwLock<SharedAppState>>) -> Vec<ScanAction> {
        let mut actions = Vec::new();

        match self.surface.permission() {
            // Nothing to show until the permission request resolves
            PermissionState::Undetermined => {
                actions.push(ScanAction::RequestPermission);
                return actions;
            }
            PermissionState::Denied => {
                if render_no_access(ui) {
                    actions.push(ScanAction::RequestPermission);
                }
                return actions;
            }
            PermissionState::Granted => {}
        }

        let ctx = ui.ctx().clone();
        let (viewport, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());

        // Still frame while captured, otherwise whatever the camera shows
        let frame = match self.controller.still_frame() {
            Some(still) => Some(still),
            None => self.surface.live_frame(),
        };
        let texture = frame.map(|frame| frame_texture(&mut self.texture, &ctx, frame));

        let painter = ui.painter_at(viewport);
        painter.rect_filled(viewport, Rounding::ZERO, Color32::BLACK);
        match texture {
            Some(texture) => {
                // Stretched to the viewport on both axes, matching the label scale
                painter.image(
                    texture.id(),
                    viewport,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.text(
                    viewport.center(),
                    Align2::CENTER_CENTER,
                    "Waiting for the camera...",
                    FontId::proportional(16.0),
                    ThemeColors::TEXT_SECONDARY,
                );
            }
        }

        match self.controller.mode() {
            Mode::Live => {
                if floating_button(ui, viewport, "Capture", ThemeColors::ACCENT_PRIMARY) {
                    actions.push(ScanAction::Capture);
                }
                ctx.request_repaint_after(PREVIEW_REPAINT);
            }
            Mode::StillCaptured => {
                self.render_pending(ui, viewport, &mut actions);
            }
            Mode::ResultsShown => {
                self.render_results(ui, viewport, shared_state, &mut actions);
            }
        }

        render_status(&ctx, viewport, shared_state);
        actions
    }

    fn render_pending(&self, ui: &mut egui::Ui, viewport: Rect, actions: &mut Vec<ScanAction>) {
        let painter = ui.painter_at(viewport);
        painter.rect_filled(viewport, Rounding::ZERO, Color32::from_black_alpha(100));

        match self.controller.error() {
            Some(message) => {
                painter.text(
                    viewport.center(),
                    Align2::CENTER_CENTER,
                    message,
                    FontId::proportional(16.0),
                    ThemeColors::ACCENT_ERROR,
                );
            }
            None => {
                ui.put(
                    Rect::from_center_size(viewport.center(), Vec2::splat(48.0)),
                    egui::Spinner::new().size(48.0),
                );
            }
        }

        if floating_button(ui, viewport, "Back", ThemeColors::BG_LIGHT) {
            actions.push(ScanAction::ContinueLive);
        }
    }

    fn render_results(
        &self,
        ui: &mut egui::Ui,
        viewport: Rect,
        shared_state: &Arc<RwLock<SharedAppState>>,
        actions: &mut Vec<ScanAction>,
    ) {
        let ctx = ui.ctx().clone();

        match self.controller.results_view() {
            ResultsView::Overlay => {
                // Viewport size is read every pass so resizes re-map the labels
                let placements = self
                    .controller
                    .label_placements(ViewportDimensions::from(viewport.size()));
                render_labels(&ctx, viewport, &placements, &self.label_style);
            }
            ResultsView::Detail => {
                render_detail_panel(&ctx, viewport, &self.control_style, self.controller.regions());
            }
        }

        if let Some(action) = render_controls(&ctx, viewport, self.controller.results_view(), &self.control_style) {
            actions.push(action.into());
        }

        let uploading = shared_state.read().runtime.upload_in_flight;
        let label = if uploading { "Saving..." } else { "Save to gallery" };
        if floating_button(ui, viewport, label, ThemeColors::ACCENT_PRIMARY) && !uploading {
            actions.push(ScanAction::Save);
        }
    }
}

/// Upload the frame to a texture unless it is already the one on screen
fn frame_texture(
    cache: &mut Option<(Instant, TextureHandle)>,
    ctx: &egui::Context,
    frame: &CapturedFrame,
) -> TextureHandle {
    if let Some((stamp, texture)) = cache {
        if *stamp == frame.timestamp {
            return texture.clone();
        }
    }

    let image = ColorImage::from_rgba_unmultiplied(
        [frame.width as usize, frame.height as usize],
        &frame.data,
    );
    let texture = ctx.load_texture("scan_frame", image, TextureOptions::LINEAR);
    *cache = Some((frame.timestamp, texture.clone()));
    texture
}

/// Wide button centered near the bottom of the viewport
fn floating_button(ui: &mut egui::Ui, viewport: Rect, text: &str, fill: Color32) -> bool {
    let rect = Rect::from_center_size(
        viewport.center_bottom() - Vec2::new(0.0, 48.0),
        Vec2::new(180.0, 44.0),
    );
    ui.put(
        rect,
        egui::Button::new(RichText::new(text).size(16.0).color(Color32::WHITE))
            .fill(fill)
            .rounding(Rounding::same(22.0)),
    )
    .clicked()
}

/// Region list drawn over the still, beside the corner controls
fn render_detail_panel(ctx: &egui::Context, viewport: Rect, controls: &ControlStyle, regions: &[DetectedRegion]) {
    let inset = controls.size + controls.spacing * 3.0;
    let panel = Rect::from_min_max(
        viewport.min + Vec2::new(inset, controls.spacing),
        viewport.max - Vec2::new(controls.spacing, 100.0),
    );

    egui::Area::new(Id::new("scan_detail"))
        .order(Order::Middle)
        .fixed_pos(panel.min)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(color_with_alpha(ThemeColors::BG_DARK, 230))
                .rounding(Rounding::same(8.0))
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.set_width((panel.width() - 24.0).max(100.0));
                    ui.set_max_height((panel.height() - 24.0).max(100.0));
                    render_detail_table(ui, regions);
                });
        });
}

/// Transient status line at the top of the viewport
fn render_status(ctx: &egui::Context, viewport: Rect, shared_state: &Arc<RwLock<SharedAppState>>) {
    let status = {
        let mut state = shared_state.write();
        state.runtime.clear_expired_status();
        state.runtime.status.clone()
    };
    let Some(status) = status else {
        return;
    };

    let color = if status.is_error {
        ThemeColors::ACCENT_ERROR
    } else {
        ThemeColors::TEXT_PRIMARY
    };

    egui::Area::new(Id::new("scan_status"))
        .order(Order::Foreground)
        .pivot(Align2::CENTER_TOP)
        .fixed_pos(viewport.center_top() + Vec2::new(0.0, 12.0))
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(color_with_alpha(ThemeColors::BG_DARK, 200))
                .rounding(Rounding::same(6.0))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(&status.text).color(color));
                });
        });
    ctx.request_repaint_after(Duration::from_millis(500));
}

/// Terminal screen shown while camera access is denied.
///
/// Returns true when the user asks to request access again.
fn render_no_access(ui: &mut egui::Ui) -> bool {
    let mut clicked = false;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.label(RichText::new("⚠").size(60.0).color(ThemeColors::ACCENT_ERROR));
        ui.add_space(12.0);
        ui.label(
            RichText::new(
                "PinyinScan needs access to this device's camera.\n\
                 Please click the button below to allow access to the camera.",
            )
            .size(16.0)
            .color(ThemeColors::TEXT_PRIMARY),
        );
        ui.add_space(16.0);
        clicked = ui
            .add(egui::Button::new("Grant Access").fill(ThemeColors::ACCENT_PRIMARY))
            .clicked();
    });
    clicked
}
