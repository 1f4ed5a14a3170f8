//! Shared state and messaging between the UI thread and network tasks

pub mod messages;
pub mod state;

pub use messages::ScanEvent;
pub use state::SharedAppState;
