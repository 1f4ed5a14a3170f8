//! Custom egui widgets for the results overlay

use egui::Color32;

use crate::config::OverlaySettings;

/// Style configuration for region labels
#[derive(Debug, Clone)]
pub struct LabelStyle {
    /// Background color (RGBA)
    pub background: [f32; 4],
    /// Text color (RGBA)
    pub text_color: [f32; 4],
    /// Border radius
    pub corner_radius: f32,
    /// Padding
    pub padding: f32,
    /// Pinyin font size; characters are drawn slightly larger
    pub font_size: f32,
    /// Show the characters under the pinyin
    pub show_source_text: bool,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 0.8],
            text_color: [1.0, 1.0, 1.0, 1.0],
            corner_radius: 6.0,
            padding: 4.0,
            font_size: 14.0,
            show_source_text: true,
        }
    }
}

impl From<&OverlaySettings> for LabelStyle {
    fn from(settings: &OverlaySettings) -> Self {
        let mut style = Self::default();
        style.background[3] = settings.label_opacity.clamp(0.0, 1.0);
        style.font_size = settings.label_font_size.max(6.0);
        style.show_source_text = settings.show_source_text;
        style
    }
}

/// Style for the round control buttons pinned to the viewport corner
#[derive(Debug, Clone)]
pub struct ControlStyle {
    pub background: [f32; 4],
    pub border: [f32; 4],
    pub size: f32,
    /// Gap to the viewport edge and between buttons
    pub spacing: f32,
}

impl Default for ControlStyle {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 0.4],
            border: [1.0, 1.0, 1.0, 1.0],
            size: 44.0,
            spacing: 5.0,
        }
    }
}

/// Convert an RGBA float color to egui
pub fn to_color32(rgba: [f32; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(
        (rgba[0].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[1].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[2].clamp(0.0, 1.0) * 255.0) as u8,
        (rgba[3].clamp(0.0, 1.0) * 255.0) as u8,
    )
}
