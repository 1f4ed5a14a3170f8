//! Results Overlay
//!
//! Draws one pressable label per detected region at its mapped position,
//! plus the return-to-live and detail-view controls pinned to the top-left
//! corner of the viewport above every label.

pub mod widgets;

use egui::{Id, Order, Pos2, Rect, RichText, Rounding, Sense, Stroke, Vec2};
use egui::popup::{popup_below_widget, PopupCloseBehavior};
use egui_extras::{Column, TableBuilder};

use crate::recognition::DetectedRegion;
use crate::scan::{LabelPlacement, ResultsView, ViewportPoint};
use crate::overlay::widgets::{to_color32, ControlStyle, LabelStyle};

/// What the user asked for through the overlay controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// Back to the live preview
    ContinueLive,
    /// Switch between labels and the detail list
    ToggleDetail,
}

/// Screen position of a label given the viewport rect it is drawn into
pub fn label_origin(viewport: Rect, position: ViewportPoint) -> Pos2 {
    viewport.min + Vec2::new(position.left, position.top)
}

/// Text copied to the clipboard from a label's menu
pub fn clipboard_text(region: &DetectedRegion) -> String {
    if region.translation.is_empty() {
        format!("{} ({})", region.source_text, region.transliteration)
    } else {
        format!(
            "{} ({}): {}",
            region.source_text, region.transliteration, region.translation
        )
    }
}

/// Draw the region labels over the viewport
pub fn render_labels(
    ctx: &egui::Context,
    viewport: Rect,
    placements: &[LabelPlacement<'_>],
    style: &LabelStyle,
) {
    for (index, placement) in placements.iter().enumerate() {
        // Unconstrained: a label near the edge stays on its text instead of
        // being pushed back into the window
        egui::Area::new(label_id(index, placement.region))
            .order(Order::Middle)
            .constrain(false)
            .fixed_pos(label_origin(viewport, placement.position))
            .show(ctx, |ui| {
                draw_label(ui, placement.region, style);
            });
    }
}

fn label_id(index: usize, region: &DetectedRegion) -> Id {
    Id::new(("scan_label", index, &region.id))
}

/// Draw a single label and its popup menu
fn draw_label(ui: &mut egui::Ui, region: &DetectedRegion, style: &LabelStyle) {
    let text_color = to_color32(style.text_color);

    let response = egui::Frame::none()
        .fill(to_color32(style.background))
        .rounding(Rounding::same(style.corner_radius))
        .inner_margin(style.padding)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(&region.transliteration)
                        .color(text_color)
                        .size(style.font_size),
                );
                if style.show_source_text {
                    ui.label(
                        RichText::new(&region.source_text)
                            .color(text_color)
                            .size(style.font_size + 4.0),
                    );
                }
            });
        })
        .response
        .interact(Sense::click());

    let popup_id = ui.make_persistent_id(("label_menu", &region.id));
    if response.clicked() {
        ui.memory_mut(|mem| mem.toggle_popup(popup_id));
    }

    popup_below_widget(
        ui,
        popup_id,
        &response,
        PopupCloseBehavior::CloseOnClickOutside,
        |ui| {
            ui.set_min_width(180.0);
            ui.label(RichText::new(&region.source_text).size(20.0).strong());
            ui.label(&region.transliteration);
            ui.separator();
            if region.translation.is_empty() {
                ui.weak("No translation");
            } else {
                ui.label(&region.translation);
            }
            ui.separator();
            if ui.button("Copy").clicked() {
                ui.output_mut(|o| o.copied_text = clipboard_text(region));
                ui.memory_mut(|mem| mem.close_popup());
            }
        },
    );
}

/// Draw the corner controls. They sit in a higher layer than the labels.
pub fn render_controls(
    ctx: &egui::Context,
    viewport: Rect,
    results_view: ResultsView,
    style: &ControlStyle,
) -> Option<OverlayAction> {
    let mut action = None;

    egui::Area::new(Id::new("scan_controls"))
        .order(Order::Foreground)
        .fixed_pos(viewport.min + Vec2::splat(style.spacing))
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = style.spacing;
            if control_button(ui, "⬅", style).on_hover_text("Back to camera").clicked() {
                action = Some(OverlayAction::ContinueLive);
            }
            let (icon, hint) = match results_view {
                ResultsView::Overlay => ("☰", "Show text list"),
                ResultsView::Detail => ("🖼", "Show labels"),
            };
            if control_button(ui, icon, style).on_hover_text(hint).clicked() {
                action = Some(OverlayAction::ToggleDetail);
            }
        });

    action
}

fn control_button(ui: &mut egui::Ui, icon: &str, style: &ControlStyle) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(icon).size(style.size * 0.45).color(egui::Color32::WHITE))
            .fill(to_color32(style.background))
            .stroke(Stroke::new(1.0, to_color32(style.border)))
            .rounding(Rounding::same(style.size / 2.0))
            .min_size(Vec2::splat(style.size)),
    )
}

/// Plain table of every region, for the detail view
pub fn render_detail_table(ui: &mut egui::Ui, regions: &[DetectedRegion]) {
    if regions.is_empty() {
        ui.label("No text was found in this image.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(24.0, |mut header| {
            header.col(|ui| {
                ui.strong("Characters");
            });
            header.col(|ui| {
                ui.strong("Pinyin");
            });
            header.col(|ui| {
                ui.strong("Translation");
            });
        })
        .body(|mut body| {
            for region in regions {
                body.row(28.0, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new(&region.source_text).size(18.0));
                    });
                    row.col(|ui| {
                        ui.label(&region.transliteration);
                    });
                    row.col(|ui| {
                        ui.label(&region.translation);
                    });
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::region::Vertex;

    fn region(translation: &str) -> DetectedRegion {
        DetectedRegion {
            id: "1".to_string(),
            source_text: "谢谢".to_string(),
            transliteration: "xiè xie".to_string(),
            translation: translation.to_string(),
            vertices: vec![Vertex { x: 0.0, y: 0.0 }],
        }
    }

    #[test]
    fn test_label_origin_offsets_by_viewport() {
        let viewport = Rect::from_min_size(Pos2::new(180.0, 24.0), Vec2::new(800.0, 600.0));

        let origin = label_origin(viewport, ViewportPoint { top: 10.0, left: 30.0 });

        assert_eq!(origin, Pos2::new(210.0, 34.0));
    }

    #[test]
    fn test_clipboard_text() {
        assert_eq!(clipboard_text(&region("thanks")), "谢谢 (xiè xie): thanks");
        assert_eq!(clipboard_text(&region("")), "谢谢 (xiè xie)");
    }

    #[test]
    fn test_label_near_edge_keeps_mapped_position() {
        let ctx = egui::Context::default();
        let screen = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0));
        let input = || egui::RawInput {
            screen_rect: Some(screen),
            ..Default::default()
        };
        let region = region("thanks");
        let placements = [LabelPlacement {
            region: &region,
            position: ViewportPoint { top: 290.0, left: 390.0 },
        }];

        // Second pass lays the label out with its measured size
        for _ in 0..2 {
            let _ = ctx.run(input(), |ctx| {
                render_labels(ctx, screen, &placements, &LabelStyle::default());
            });
        }

        let rect = ctx
            .memory(|mem| mem.area_rect(label_id(0, &region)))
            .unwrap();
        assert_eq!(rect.min, Pos2::new(390.0, 290.0));
        assert!(rect.max.x > screen.max.x);
    }
}
