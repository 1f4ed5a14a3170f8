//! Scan core
//!
//! Mode state machine, frame-to-viewport coordinate mapping and label
//! layout for the results overlay. Nothing in here touches the UI toolkit
//! beyond plain geometry, so it is fully unit tested.

pub mod layout;
pub mod mapper;
pub mod mode;

pub use layout::LabelPlacement;
pub use mapper::{FrameDimensions, ViewportDimensions, ViewportPoint};
pub use mode::{Mode, ModeController, ResultsView, ScanRequest};
