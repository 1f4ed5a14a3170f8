//! Recognition Layer
//!
//! Text recognition runs on the backend. This module holds the region
//! shape the backend returns and the client that sends a still frame to it.

pub mod region;
pub mod service;

pub use region::{joined_source_text, DetectedRegion};
pub use service::{HttpRecognitionService, RecognitionService};
