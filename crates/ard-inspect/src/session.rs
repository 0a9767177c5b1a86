use rustc_hash::FxHashMap;

/// Scroll position of one panel.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ScrollState {
    pub offset: egui::Vec2,
}

/// UI state that outlives a single frame.
///
/// Owned by the host and passed into every panel, so two explorers in the same process never
/// share scroll positions or filters.
#[derive(Debug, Default)]
pub struct UiSessionState {
    scrolls: FxHashMap<String, ScrollState>,
    /// Text typed into the component filter box.
    pub component_filter: String,
}

impl UiSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll state of `panel`, created at the top the first time it is requested.
    pub fn scroll(&mut self, panel: &str) -> &mut ScrollState {
        self.scrolls.entry(panel.to_owned()).or_default()
    }

    /// Scroll state of `panel`, if it was ever shown.
    pub fn scroll_of(&self, panel: &str) -> Option<&ScrollState> {
        self.scrolls.get(panel)
    }

    /// Drops the state of a closed panel.
    pub fn forget(&mut self, panel: &str) {
        self.scrolls.remove(panel);
    }

    /// Number of panels with remembered state.
    pub fn panel_count(&self) -> usize {
        self.scrolls.len()
    }
}
