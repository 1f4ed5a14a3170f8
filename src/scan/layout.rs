//! Label layout for the results overlay

use tracing::warn;

use crate::recognition::DetectedRegion;
use crate::scan::mapper::{map_region, FrameDimensions, ScaleFactor, ViewportDimensions, ViewportPoint};

/// Where one region's label goes in the viewport
#[derive(Debug, Clone, Copy)]
pub struct LabelPlacement<'a> {
    pub region: &'a DetectedRegion,
    pub position: ViewportPoint,
}

/// Lay out one label per region, in result-set order.
///
/// The scale is derived from the viewport passed in, so callers must pass
/// the size read for the current render pass.
pub fn layout_labels<'a>(
    regions: &'a [DetectedRegion],
    frame: Option<FrameDimensions>,
    viewport: ViewportDimensions,
) -> Vec<LabelPlacement<'a>> {
    let scale = ScaleFactor::between(frame, viewport);

    regions
        .iter()
        .filter_map(|region| match map_region(region, scale) {
            Some(position) => Some(LabelPlacement { region, position }),
            None => {
                warn!("Region {} has no vertices, not placing a label", region.id);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::region::Vertex;

    fn region(id: &str, x: f32, y: f32) -> DetectedRegion {
        DetectedRegion {
            id: id.to_string(),
            source_text: "中".to_string(),
            transliteration: "zhōng".to_string(),
            translation: "middle".to_string(),
            vertices: vec![Vertex { x, y }],
        }
    }

    #[test]
    fn test_one_label_per_region_in_order() {
        let regions = vec![region("a", 10.0, 10.0), region("b", 5.0, 300.0), region("c", 0.0, 0.0)];

        let labels = layout_labels(
            &regions,
            Some(FrameDimensions::new(100.0, 100.0)),
            ViewportDimensions::new(200.0, 50.0),
        );

        let ids: Vec<_> = labels.iter().map(|l| l.region.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(labels[0].position, ViewportPoint { top: 5.0, left: 20.0 });
        assert_eq!(labels[1].position, ViewportPoint { top: 150.0, left: 10.0 });
    }

    #[test]
    fn test_region_without_vertices_is_skipped() {
        let mut broken = region("broken", 0.0, 0.0);
        broken.vertices.clear();
        let regions = vec![region("ok", 1.0, 2.0), broken];

        let labels = layout_labels(&regions, None, ViewportDimensions::new(10.0, 10.0));

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].region.id, "ok");
    }

    #[test]
    fn test_empty_result_set() {
        let labels = layout_labels(&[], None, ViewportDimensions::new(10.0, 10.0));
        assert!(labels.is_empty());
    }
}
