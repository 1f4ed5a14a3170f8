//! Dashboard application entry point

use eframe::egui;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::ScanServices;
use crate::capture::{CaptureConfig, ImageSourceSurface};
use crate::dashboard::components::render_sidebar;
use crate::dashboard::state::{DashboardState, DashboardView};
use crate::dashboard::theme;
use crate::dashboard::views::{render_gallery_view, ScanAction, ScanScreen};
use crate::hotkey::ScanShortcuts;
use crate::shared::{ScanEvent, SharedAppState};
use crate::storage::SessionStore;

/// The main dashboard application
pub struct DashboardApp {
    /// Shared application state
    shared_state: Arc<RwLock<SharedAppState>>,
    /// Dashboard-specific state
    dashboard_state: DashboardState,
    /// Whether theme and fonts have been applied
    theme_applied: bool,
    /// Scan screen with its capture surface
    scan: ScanScreen,
    /// Backend request runner
    services: ScanServices,
    /// Keyboard shortcuts for the scan screen
    shortcuts: ScanShortcuts,
    /// Where the session is re-read from when the scan screen gains focus
    session_store: Option<SessionStore>,
}

impl DashboardApp {
    /// Create a new dashboard application
    pub fn new(
        shared_state: Arc<RwLock<SharedAppState>>,
        services: ScanServices,
        session_store: Option<SessionStore>,
    ) -> Self {
        let (dashboard_state, scan, shortcuts) = {
            let state = shared_state.read();
            let surface = ImageSourceSurface::new(CaptureConfig::from(&state.config.capture));
            info!("Camera source: {:?}", surface.source());
            (
                DashboardState::new(state.config.general.start_view),
                ScanScreen::new(Box::new(surface), &state.config.overlay),
                ScanShortcuts::from_settings(&state.config.shortcuts),
            )
        };

        Self {
            shared_state,
            dashboard_state,
            theme_applied: false,
            scan,
            services,
            shortcuts,
            session_store,
        }
    }

    /// Create eframe options for the dashboard window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 760.0])
                .with_min_inner_size([640.0, 480.0])
                .with_title("PinyinScan"),
            ..Default::default()
        }
    }

    /// Re-read the signed-in identity
    fn refresh_session(&mut self) {
        let Some(store) = &self.session_store else {
            return;
        };
        let session = store.load_or_anonymous();
        let mut state = self.shared_state.write();
        if state.session != session {
            info!("Session changed, user: {:?}", session.user_id);
            state.session = session;
        }
    }

    /// Apply results from finished backend requests
    fn process_events(&mut self) {
        for event in self.services.drain_events() {
            match event {
                ScanEvent::RecognitionFinished { scan_id, result } => {
                    self.scan.recognition_finished(scan_id, result);
                }
                ScanEvent::UploadFinished { result } => {
                    let mut state = self.shared_state.write();
                    state.runtime.upload_in_flight = false;
                    match result {
                        Ok(stored) => {
                            info!("Saved scan as {}", stored.image_path);
                            state.gallery.add(stored.image_path);
                            state.runtime.set_status("Saved to gallery");
                        }
                        Err(e) => {
                            warn!("Save failed: {}", e);
                            state.runtime.set_error(format!("Save failed: {}", e));
                        }
                    }
                }
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            let font_path = self.shared_state.read().config.overlay.font_path.clone();
            theme::install_cjk_font(ctx, font_path.as_deref());
            self.theme_applied = true;
        }

        self.process_events();

        // Sidebar panel
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                let (session, saved_scans) = {
                    let state = self.shared_state.read();
                    (state.session.clone(), state.gallery.len())
                };
                render_sidebar(ui, &mut self.dashboard_state.current_view, &session, saved_scans);
            });

        if self.dashboard_state.track_focus() {
            self.refresh_session();
            self.scan.focus_gained();
        }

        let mut actions = Vec::new();
        if self.dashboard_state.current_view == DashboardView::Scan {
            if let Some(action) = self.shortcuts.poll(ctx) {
                actions.push(ScanAction::from(action));
            }
        }

        // Main content panel
        let mut reload_session = false;
        match self.dashboard_state.current_view {
            DashboardView::Scan => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        actions.extend(self.scan.show(ui, &self.shared_state));
                    });
            }
            DashboardView::Gallery => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::Frame::none().inner_margin(24.0).show(ui, |ui| {
                        reload_session = render_gallery_view(ui, &self.shared_state);
                    });
                });
            }
        }

        for action in actions {
            self.scan.apply(action, &self.services, &self.shared_state);
        }
        if reload_session {
            self.refresh_session();
        }
    }
}

/// Run the dashboard application
pub fn run_dashboard(
    shared_state: Arc<RwLock<SharedAppState>>,
    services: ScanServices,
    session_store: Option<SessionStore>,
) -> Result<(), eframe::Error> {
    let mut app = DashboardApp::new(shared_state, services, session_store);
    eframe::run_native(
        "PinyinScan",
        DashboardApp::options(),
        Box::new(move |cc| {
            app.services.set_repaint_context(cc.egui_ctx.clone());
            Ok(Box::new(app))
        }),
    )
}
