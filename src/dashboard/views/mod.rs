//! Dashboard views

pub mod gallery;
pub mod scan;

pub use gallery::render_gallery_view;
pub use scan::{ScanAction, ScanScreen};
