//! Frame-space to viewport-space coordinate mapping
//!
//! Detected regions come back in the pixel space of the captured frame. The
//! scan view may show that frame at a different size, so every render pass
//! recomputes the per-axis scale from the live viewport size.

use crate::recognition::DetectedRegion;

/// Pixel size of the originally captured frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDimensions {
    pub width: f32,
    pub height: f32,
}

impl FrameDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Current on-screen size of the area the frame is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportDimensions {
    pub width: f32,
    pub height: f32,
}

impl ViewportDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<egui::Vec2> for ViewportDimensions {
    fn from(size: egui::Vec2) -> Self {
        Self::new(size.x, size.y)
    }
}

/// Per-axis ratio converting frame-space to viewport-space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    pub width_ratio: f32,
    pub height_ratio: f32,
}

impl ScaleFactor {
    pub const IDENTITY: ScaleFactor = ScaleFactor {
        width_ratio: 1.0,
        height_ratio: 1.0,
    };

    /// Compute the scale between a captured frame and the viewport.
    ///
    /// Falls back to the identity scale when no frame has been captured or
    /// the frame height is zero.
    pub fn between(frame: Option<FrameDimensions>, viewport: ViewportDimensions) -> Self {
        match frame {
            Some(frame) if frame.height != 0.0 => Self {
                width_ratio: viewport.width / frame.width,
                height_ratio: viewport.height / frame.height,
            },
            _ => Self::IDENTITY,
        }
    }
}

/// Position of a label in viewport pixels, relative to the viewport origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPoint {
    pub top: f32,
    pub left: f32,
}

/// Map a region's reference corner (its first vertex) into viewport-space.
///
/// Returns `None` for a region without vertices.
pub fn map_region(region: &DetectedRegion, scale: ScaleFactor) -> Option<ViewportPoint> {
    let anchor = region.reference_corner()?;
    Some(ViewportPoint {
        top: anchor.y * scale.height_ratio,
        left: anchor.x * scale.width_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::region::Vertex;

    fn region_at(x: f32, y: f32) -> DetectedRegion {
        DetectedRegion {
            id: "r1".to_string(),
            source_text: "你好".to_string(),
            transliteration: "nǐ hǎo".to_string(),
            translation: "hello".to_string(),
            vertices: vec![Vertex { x, y }, Vertex { x: x + 40.0, y }],
        }
    }

    #[test]
    fn test_scale_is_exact_ratio() {
        let frame = FrameDimensions::new(800.0, 600.0);
        let viewport = ViewportDimensions::new(1000.0, 450.0);

        let scale = ScaleFactor::between(Some(frame), viewport);

        assert_eq!(scale.width_ratio, 1000.0 / 800.0);
        assert_eq!(scale.height_ratio, 450.0 / 600.0);
    }

    #[test]
    fn test_scale_identity_without_frame() {
        let scale = ScaleFactor::between(None, ViewportDimensions::new(1080.0, 2220.0));
        assert_eq!(scale, ScaleFactor::IDENTITY);
    }

    #[test]
    fn test_scale_identity_for_zero_height() {
        let frame = FrameDimensions::new(1080.0, 0.0);
        let scale = ScaleFactor::between(Some(frame), ViewportDimensions::new(500.0, 500.0));
        assert_eq!(scale, ScaleFactor::IDENTITY);
    }

    #[test]
    fn test_map_region_uses_first_vertex() {
        let scale = ScaleFactor {
            width_ratio: 2.0,
            height_ratio: 0.5,
        };

        let point = map_region(&region_at(30.0, 80.0), scale).unwrap();

        assert_eq!(point.left, 60.0);
        assert_eq!(point.top, 40.0);
    }

    #[test]
    fn test_portrait_phone_scenario() {
        let frame = FrameDimensions::new(1080.0, 1920.0);
        let viewport = ViewportDimensions::new(1080.0, 2220.0);
        let scale = ScaleFactor::between(Some(frame), viewport);

        let point = map_region(&region_at(100.0, 200.0), scale).unwrap();

        assert!((point.left - 100.0).abs() < 0.001);
        assert!((point.top - 231.25).abs() < 0.001);
    }

    #[test]
    fn test_unset_frame_scenario() {
        let scale = ScaleFactor::between(None, ViewportDimensions::new(1080.0, 2220.0));

        let point = map_region(&region_at(50.0, 50.0), scale).unwrap();

        assert_eq!(point, ViewportPoint { top: 50.0, left: 50.0 });
    }

    #[test]
    fn test_region_without_vertices_does_not_map() {
        let mut region = region_at(0.0, 0.0);
        region.vertices.clear();

        assert!(map_region(&region, ScaleFactor::IDENTITY).is_none());
    }

    #[test]
    fn test_viewport_change_rescales() {
        let frame = Some(FrameDimensions::new(400.0, 400.0));
        let region = region_at(100.0, 100.0);

        let portrait = ScaleFactor::between(frame, ViewportDimensions::new(400.0, 800.0));
        let landscape = ScaleFactor::between(frame, ViewportDimensions::new(800.0, 400.0));

        let a = map_region(&region, portrait).unwrap();
        let b = map_region(&region, landscape).unwrap();

        assert_eq!((a.left, a.top), (100.0, 200.0));
        assert_eq!((b.left, b.top), (200.0, 100.0));
    }
}
