//! Gallery of saved scans
//!
//! Kept in memory and updated as soon as an upload succeeds, so the gallery
//! view reflects a save without re-fetching from the backend.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved scan image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    /// Local identifier
    pub id: String,
    /// Path or URL of the stored image returned by the backend
    #[serde(rename = "imagePath")]
    pub image_path: String,
}

/// Saved scans, oldest first
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    images: Vec<GalleryImage>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stored image under a fresh id
    pub fn add(&mut self, image_path: impl Into<String>) -> &GalleryImage {
        self.images.push(GalleryImage {
            id: Uuid::new_v4().to_string(),
            image_path: image_path.into(),
        });
        &self.images[self.images.len() - 1]
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
