//! Dashboard UI Module
//!
//! The PinyinScan window: a sidebar, the scan screen with its camera
//! preview and results overlay, and the gallery of saved scans.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;
