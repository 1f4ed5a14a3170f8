//! Sidebar navigation component

use egui::{RichText, Vec2};

use crate::dashboard::state::DashboardView;
use crate::dashboard::theme::ThemeColors;
use crate::storage::Session;

/// Height of a navigation entry
const ENTRY_HEIGHT: f32 = 34.0;

/// Render the sidebar: title, the two views, and who saves are made as.
///
/// `saved_scans` is shown next to the gallery entry.
pub fn render_sidebar(
    ui: &mut egui::Ui,
    current_view: &mut DashboardView,
    session: &Session,
    saved_scans: usize,
) {
    ui.add_space(16.0);
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new("拼音")
                .size(26.0)
                .color(ThemeColors::ACCENT_PRIMARY)
                .strong(),
        );
        ui.label(RichText::new("PinyinScan").size(11.0).color(ThemeColors::TEXT_MUTED));
    });
    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    for view in [DashboardView::Scan, DashboardView::Gallery] {
        let text = match view {
            DashboardView::Gallery if saved_scans > 0 => {
                format!("{}  {} ({})", view.icon(), view.name(), saved_scans)
            }
            _ => format!("{}  {}", view.icon(), view.name()),
        };
        let selected = *current_view == view;
        let entry = egui::SelectableLabel::new(selected, RichText::new(text).size(14.0));
        // Full-width entries so the whole row is clickable
        let size = Vec2::new(ui.available_width(), ENTRY_HEIGHT);
        if ui.add_sized(size, entry).clicked() && !selected {
            *current_view = view;
        }
    }

    ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
        ui.add_space(12.0);
        ui.label(session_line(session));
        ui.separator();
    });
}

/// Footer text for the current identity
fn session_line(session: &Session) -> RichText {
    match session.user_id.as_deref() {
        Some(user) if session.is_authenticated() => {
            RichText::new(format!("Signed in: {}", user))
                .size(10.0)
                .color(ThemeColors::ACCENT_SUCCESS)
        }
        _ => RichText::new("Signed out").size(10.0).color(ThemeColors::TEXT_MUTED),
    }
}
