//! Rendered form of the suggestion panel.
//!
//! The panel is a `role="listbox"` container whose `role="option"` children
//! carry stable ids so `aria-activedescendant` can track the highlight.

/// Fixed-position coordinates of the panel's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelPosition {
    /// Distance from the top of the page.
    pub top: f64,
    /// Distance from the left of the page.
    pub left: f64,
}

/// One option row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    /// DOM id (`promptrc-option-<i>`).
    pub dom_id: String,
    /// Pattern id the option inserts.
    pub pattern_id: String,
    /// Title line: icon followed by the short name.
    pub title: String,
    /// Truncated trigger preview.
    pub preview: String,
    /// `aria-selected`.
    pub selected: bool,
}

/// Complete panel state handed to the host for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    /// Accessible label of the listbox.
    pub aria_label: String,
    /// DOM id of the highlighted option.
    pub active_descendant: Option<String>,
    /// Option rows in display order.
    pub options: Vec<OptionView>,
    /// Placement.
    pub position: PanelPosition,
    /// Stacking order.
    pub z_index: i64,
}

impl PanelView {
    /// Index of the option marked selected.
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.options.iter().position(|option| option.selected)
    }
}
