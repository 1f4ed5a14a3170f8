//! Events sent from background tasks to the UI thread

use crate::recognition::DetectedRegion;
use crate::upload::StoredImage;

/// Completion of a network task
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// The recognition request for a capture finished
    RecognitionFinished {
        scan_id: u64,
        result: Result<Vec<DetectedRegion>, String>,
    },
    /// A save-to-gallery upload finished
    UploadFinished {
        result: Result<StoredImage, String>,
    },
}
