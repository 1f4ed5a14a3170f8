//! Frame data structures for captured camera content

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::time::Instant;

use crate::capture::CaptureError;
use crate::scan::FrameDimensions;

/// A frame produced by the capture surface
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Create a new captured frame
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// Build a frame from a decoded RGBA image
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Frame size in the form the coordinate mapper expects
    pub fn frame_dimensions(&self) -> FrameDimensions {
        FrameDimensions::new(self.width as f32, self.height as f32)
    }

    /// Encode the frame as PNG for upload
    pub fn to_png(&self) -> Result<Vec<u8>, CaptureError> {
        let image = RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or(CaptureError::InvalidFrame {
                width: self.width,
                height: self.height,
                len: self.data.len(),
            })?;

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(CaptureError::Encode)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dimensions() {
        let frame = CapturedFrame::new(vec![0; 4 * 6 * 3], 6, 3);
        assert_eq!(frame.dimensions(), (6, 3));
        assert_eq!(frame.frame_dimensions(), FrameDimensions::new(6.0, 3.0));
    }

    #[test]
    fn test_png_encoding_has_signature() {
        let frame = CapturedFrame::from_image(RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255])));

        let png = frame.to_png().unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_png_encoding_rejects_short_buffer() {
        let frame = CapturedFrame::new(vec![0; 10], 4, 4);
        assert!(matches!(frame.to_png(), Err(CaptureError::InvalidFrame { .. })));
    }
}
