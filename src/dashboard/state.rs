//! Dashboard view state management

use crate::config::StartView;

/// Current view in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    Scan,
    Gallery,
}

impl DashboardView {
    /// Get the display name for this view
    pub fn name(&self) -> &'static str {
        match self {
            DashboardView::Scan => "Scan",
            DashboardView::Gallery => "Gallery",
        }
    }

    /// Get the icon character for this view
    pub fn icon(&self) -> &'static str {
        match self {
            DashboardView::Scan => "📷",
            DashboardView::Gallery => "🖼",
        }
    }

    /// Convert from persisted setting
    pub fn from_setting(setting: StartView) -> Self {
        match setting {
            StartView::Scan => DashboardView::Scan,
            StartView::Gallery => DashboardView::Gallery,
        }
    }
}

/// Overall dashboard state
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Current active view
    pub current_view: DashboardView,
    /// View shown on the previous frame, for focus change detection
    pub previous_view: Option<DashboardView>,
}

impl DashboardState {
    pub fn new(start_view: StartView) -> Self {
        Self {
            current_view: DashboardView::from_setting(start_view),
            ..Default::default()
        }
    }

    /// Record this frame's view.
    ///
    /// Returns true when the scan view was just navigated to, including the
    /// first frame. OS window focus is not a navigation; leaving the window
    /// and coming back keeps whatever the scan view was showing.
    pub fn track_focus(&mut self) -> bool {
        let entered_scan = self.current_view == DashboardView::Scan
            && self.previous_view != Some(DashboardView::Scan);
        self.previous_view = Some(self.current_view);
        entered_scan
    }
}
