//! Gallery view - saved scans and the current identity

use egui::RichText;
use egui_extras::{Column, TableBuilder};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::dashboard::theme::ThemeColors;
use crate::shared::SharedAppState;

/// Render the gallery view.
///
/// Returns true when the user asks to reload the session from disk.
pub fn render_gallery_view(ui: &mut egui::Ui, shared_state: &Arc<RwLock<SharedAppState>>) -> bool {
    let app_state = shared_state.read();
    let mut reload_session = false;

    ui.heading(RichText::new("Gallery").size(24.0).strong());
    ui.add_space(8.0);
    ui.label(
        RichText::new("Scans saved during this session")
            .size(14.0)
            .color(ThemeColors::TEXT_SECONDARY),
    );

    ui.add_space(16.0);

    // Identity used for saves
    ui.horizontal(|ui| {
        let session = &app_state.session;
        let text = match session.user_id.as_deref() {
            Some(user) if session.is_authenticated() => format!("Saving as {}", user),
            Some(user) => format!("Saving as {} (no session token)", user),
            None => "Not signed in, saves are anonymous".to_string(),
        };
        ui.label(RichText::new(text).color(ThemeColors::TEXT_PRIMARY));
        if ui.button("Reload session").clicked() {
            reload_session = true;
        }
    });

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(16.0);

    if app_state.gallery.is_empty() {
        ui.label(
            RichText::new("Nothing saved yet. Capture a scan and press \"Save to gallery\".")
                .color(ThemeColors::TEXT_MUTED),
        );
        return reload_session;
    }

    let images = app_state.gallery.images();
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::exact(40.0))
        .column(Column::remainder().at_least(200.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Stored image");
            });
        })
        .body(|body| {
            body.rows(22.0, images.len(), |mut row| {
                let index = row.index();
                let image = &images[index];
                row.col(|ui| {
                    ui.label(RichText::new((index + 1).to_string()).color(ThemeColors::TEXT_MUTED));
                });
                row.col(|ui| {
                    ui.label(&image.image_path).on_hover_text(&image.id);
                });
            });
        });

    reload_session
}
