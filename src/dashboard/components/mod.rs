//! Reusable UI components for the dashboard

pub mod sidebar;

pub use sidebar::render_sidebar;
